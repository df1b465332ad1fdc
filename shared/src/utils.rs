use std::path::Path;

/// Upload boundary check: only PDF files may be attached to a session.
pub fn is_pdf_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    ext.eq_ignore_ascii_case("pdf")
}

/// Filename used as the extraction cache key.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
