//! Document loading: turns an uploaded file into the plain text that gets rephrased.
//!
//! The loader is picked from the file extension alone. Anything unrecognised is
//! read as UTF-8 text.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

mod docx;
mod markdown;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File is not valid UTF-8 text")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("Could not read DOCX archive: {0}")]
    DocxArchive(#[from] zip::result::ZipError),

    #[error("Could not parse DOCX body: {0}")]
    DocxXml(#[from] quick_xml::Error),

    #[error("Could not read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read {0:?} document")]
    Unreadable(DocumentKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Markdown,
    Docx,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("md") => DocumentKind::Markdown,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// Extracts the text of a document. CPU-bound for PDFs; call from a blocking task.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
        DocumentKind::Pdf => extract_pdf_text(bytes),
        DocumentKind::Markdown => {
            let source = String::from_utf8(bytes.to_vec())?;
            Ok(markdown::to_plain_text(&source))
        }
        DocumentKind::Docx => docx::extract_body_text(bytes),
    }
}

/// pdf-extract panics instead of erroring on some malformed files (missing
/// `MediaBox`, dangling references). Those count as unreadable documents.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| DocumentError::Pdf(e.to_string())),
        Err(_) => {
            warn!("PDF extractor panicked on a {}-byte upload", bytes.len());
            Err(DocumentError::Pdf(
                "the file is damaged or uses unsupported features".to_string(),
            ))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    /// A PDF with a valid xref table whose only page has no `MediaBox`.
    pub fn pdf_without_media_box() -> Vec<u8> {
        let objects = [
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
            "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
            "3 0 obj\n<< /Type /Page /Parent 2 0 R >>\nendobj\n",
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for object in objects {
            offsets.push(pdf.len());
            pdf.push_str(object);
        }

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }
}
