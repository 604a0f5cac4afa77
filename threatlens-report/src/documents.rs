//! Document normalization
//!
//! Turns each uploaded file into a short text stub for prompt inclusion.
//! Plain-text formats are decoded verbatim; binary formats become a
//! placeholder tag. Content of non-text formats is never parsed.

use std::path::Path;

use threatlens_core::{DocumentStub, UploadedFile};

/// Extensions decoded as UTF-8 text
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "yaml", "yml", "json", "csv"];

/// Normalize one uploaded file into a prompt stub.
///
/// Pure function of (filename, bytes); never fails. A document that cannot
/// be decoded yields an inline error stub so one bad file does not abort the
/// whole request.
pub fn normalize_document(file: &UploadedFile) -> DocumentStub {
    let extension = Path::new(&file.name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    let content = if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        match std::str::from_utf8(&file.bytes) {
            Ok(text) => text.to_string(),
            Err(e) => format!("[Error reading {}: {}]", file.name, e),
        }
    } else if extension == "pdf" {
        format!("[PDF Document: {}]", file.name)
    } else {
        format!("[{} Document: {}]", extension.to_uppercase(), file.name)
    };

    DocumentStub {
        filename: file.name.clone(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_file_decoded_verbatim() {
        let file = UploadedFile::new("design.md", b"# Design\n\nNotes.".to_vec());
        let stub = normalize_document(&file);
        assert_eq!(stub.filename, "design.md");
        assert_eq!(stub.content, "# Design\n\nNotes.");
    }

    #[test]
    fn test_pdf_becomes_placeholder() {
        let file = UploadedFile::new("diagram.pdf", vec![0x25, 0x50, 0x44, 0x46]);
        let stub = normalize_document(&file);
        assert_eq!(stub.content, "[PDF Document: diagram.pdf]");
    }

    #[test]
    fn test_other_binary_formats_become_tagged_placeholders() {
        let file = UploadedFile::new("flows.png", vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(
            normalize_document(&file).content,
            "[PNG Document: flows.png]"
        );

        let file = UploadedFile::new("spec.docx", vec![0x50, 0x4b]);
        assert_eq!(
            normalize_document(&file).content,
            "[DOCX Document: spec.docx]"
        );
    }

    #[test]
    fn test_invalid_utf8_yields_inline_error_stub() {
        let file = UploadedFile::new("notes.txt", vec![0xff, 0xfe, 0x00]);
        let stub = normalize_document(&file);
        assert!(stub.content.starts_with("[Error reading notes.txt:"));
    }

    #[test]
    fn test_extensionless_file_is_a_placeholder() {
        let file = UploadedFile::new("Dockerfile", b"FROM rust".to_vec());
        assert_eq!(
            normalize_document(&file).content,
            "[ Document: Dockerfile]"
        );
    }

    #[test]
    fn test_uploaded_file_size() {
        let file = UploadedFile::new("a.txt", vec![0; 2048]);
        assert_eq!(file.size(), 2048);
    }
}
