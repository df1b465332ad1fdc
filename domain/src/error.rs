//! Error taxonomy for a single chat turn.
//!
//! Nothing here is fatal to the process: document errors degrade the turn to
//! "no context", completion errors are reported inline and leave the session usable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentParseError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("the uploaded file is not a PDF document")]
    NotPdf,

    #[error("{0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("missing configuration setting {setting}")]
    Configuration { setting: &'static str },

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    ResponseShape(String),
}

impl CompletionError {
    /// Inline message shown in place of an assistant reply.
    pub fn user_message(&self) -> String {
        format!("Error communicating with the API: {self}")
    }
}
