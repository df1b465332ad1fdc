use std::io::Read;

/// An uploaded payload plus the filename used as its cache key.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Drains `reader` once; the stream is never revisited.
    pub fn from_reader(filename: impl Into<String>, mut reader: impl Read) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(filename, bytes))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Result of the last extraction, keyed by filename.
///
/// `text` is `None` when extraction failed, so an unchanged broken upload is
/// not parsed again on every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    filename: String,
    text: Option<String>,
}

impl ExtractedText {
    pub fn new(filename: impl Into<String>, text: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            text,
        }
    }

    pub fn is_valid_for(&self, document: &UploadedDocument) -> bool {
        self.filename == document.filename()
    }

    /// Text worth injecting as context, if any.
    pub fn context(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}
