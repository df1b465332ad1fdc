pub const CONTEXT_START: &str = "--- DOCUMENT CONTEXT ---";
pub const CONTEXT_END: &str = "--- END CONTEXT ---";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Builds the effective prompt sent for the current turn.
///
/// Document text is only injected when present and non-empty. The result is
/// trimmed as a whole.
pub fn assemble_prompt(document_text: Option<&str>, question: &str) -> String {
    let context = match document_text {
        Some(text) if !text.is_empty() => format!("{CONTEXT_START}\n{text}\n{CONTEXT_END}"),
        _ => String::new(),
    };
    format!("{context}\n\nUser Question: {question}")
        .trim()
        .to_string()
}
