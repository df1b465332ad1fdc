use crate::conversation::Turn;
use crate::error::{CompletionError, DocumentParseError};

/// Converts a PDF payload into one text blob, pages concatenated in order.
pub trait DocumentExtractor {
    fn extract(&self, payload: &[u8]) -> Result<String, DocumentParseError>;
}

/// One attempt against the remote completion endpoint; returns the reply text.
pub trait CompletionBackend {
    fn complete(
        &self,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}
