use crate::conversation::ConversationStore;
use crate::document::{ExtractedText, UploadedDocument};
use uuid::Uuid;

/// Everything one interactive session owns: history, active upload, extraction cache.
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: String,
    pub conversation: ConversationStore,
    document: Option<UploadedDocument>,
    extracted: Option<ExtractedText>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: String) -> Self {
        Self {
            id,
            conversation: ConversationStore::new(),
            document: None,
            extracted: None,
        }
    }

    /// Replaces the active upload. The cache is left alone; a filename
    /// mismatch is what forces re-extraction.
    pub fn attach_document(&mut self, document: UploadedDocument) {
        self.document = Some(document);
    }

    pub fn detach_document(&mut self) -> Option<UploadedDocument> {
        self.document.take()
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn extracted(&self) -> Option<&ExtractedText> {
        self.extracted.as_ref()
    }

    /// Cached extraction for the active upload, if it is still valid.
    pub fn cached_extraction(&self) -> Option<&ExtractedText> {
        let document = self.document.as_ref()?;
        self.extracted
            .as_ref()
            .filter(|entry| entry.is_valid_for(document))
    }

    pub fn store_extraction(&mut self, entry: ExtractedText) {
        self.extracted = Some(entry);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
