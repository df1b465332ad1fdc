//! Turn orchestration: extract (when stale), assemble, record, invoke, record.

use domain::conversation::Turn;
use domain::document::ExtractedText;
use domain::error::{CompletionError, DocumentParseError};
use domain::ports::{CompletionBackend, DocumentExtractor};
use domain::prompt::assemble_prompt;
use domain::session::ChatSession;
use infrastructure::completion_client::HttpCompletionClient;
use infrastructure::config::Config;
use infrastructure::pdf_extractor::PdfTextExtractor;
use shared::types::Result;
use tracing::{info, warn};

/// How the active upload contributed to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    NoDocument,
    Cached,
    Extracted,
    Failed(DocumentParseError),
}

/// Everything one user input produced. Failures are values, never panics or `Err`.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub effective_prompt: String,
    pub document: DocumentStatus,
    pub outcome: std::result::Result<String, CompletionError>,
}

impl TurnReport {
    pub fn reply(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.outcome.as_ref().err().map(CompletionError::user_message)
    }

    pub fn document_notice(&self) -> Option<String> {
        match &self.document {
            DocumentStatus::Failed(e) => Some(format!("Error reading PDF file: {e}")),
            _ => None,
        }
    }
}

pub struct ChatService<E, C> {
    extractor: E,
    backend: C,
    system_prompt: String,
}

impl ChatService<PdfTextExtractor, HttpCompletionClient> {
    pub fn from_config(config: Config) -> Result<Self> {
        let system_prompt = config.system_prompt.clone();
        let backend = HttpCompletionClient::new(config)?;
        Ok(Self::new(PdfTextExtractor::new(), backend, system_prompt))
    }
}

impl<E, C> ChatService<E, C>
where
    E: DocumentExtractor,
    C: CompletionBackend,
{
    pub fn new(extractor: E, backend: C, system_prompt: impl Into<String>) -> Self {
        Self {
            extractor,
            backend,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Runs one turn to completion. Returns `None` for blank input.
    ///
    /// The user turn is always recorded with the raw question; the assistant
    /// turn only when the backend produced a non-blank reply.
    pub async fn handle_input(&self, session: &mut ChatSession, question: &str) -> Option<TurnReport> {
        if question.trim().is_empty() {
            return None;
        }

        let (context, document) = self.document_context(session);
        let effective_prompt = assemble_prompt(context.as_deref(), question);
        session.conversation.push_user(question);
        // Stored history ends with the raw question; the assembled prompt follows it.
        let request = session
            .conversation
            .request_with(&self.system_prompt, Turn::user(effective_prompt.clone()));

        info!(
            session = %session.id,
            history = session.conversation.len(),
            with_context = context.is_some(),
            "Sending question"
        );
        let outcome = match self.backend.complete(&request).await {
            Ok(reply) if reply.trim().is_empty() => Err(CompletionError::ResponseShape(
                "reply text is empty".into(),
            )),
            other => other,
        };

        match &outcome {
            Ok(reply) => session.conversation.push_assistant(reply.clone()),
            Err(e) => warn!(session = %session.id, error = %e, "Turn ended without a reply"),
        }

        Some(TurnReport {
            effective_prompt,
            document,
            outcome,
        })
    }

    /// Returns the text to inject for this turn, extracting only when the cache
    /// has nothing for the active filename.
    fn document_context(&self, session: &mut ChatSession) -> (Option<String>, DocumentStatus) {
        if let Some(entry) = session.cached_extraction() {
            return (entry.context().map(str::to_owned), DocumentStatus::Cached);
        }
        let Some(document) = session.document() else {
            return (None, DocumentStatus::NoDocument);
        };

        let filename = document.filename().to_string();
        info!(session = %session.id, file = %filename, "Processing document");
        let (text, status) = match self.extractor.extract(document.bytes()) {
            Ok(text) => (Some(text), DocumentStatus::Extracted),
            Err(e) => {
                warn!(file = %filename, error = %e, "Continuing without document context");
                (None, DocumentStatus::Failed(e))
            }
        };
        let entry = ExtractedText::new(filename, text);
        let context = entry.context().map(str::to_owned);
        session.store_extraction(entry);
        (context, status)
    }
}
