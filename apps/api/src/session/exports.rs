//! Download variants of the rephrased text.
//!
//! All three formats carry the same raw bytes; no format conversion happens.
//! Only the filename differs.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Md,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Txt, ExportFormat::Md, ExportFormat::Docx];

    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Txt => "rephrased_text.txt",
            ExportFormat::Md => "rephrased_text.md",
            ExportFormat::Docx => "rephrased_text.docx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Txt => "Download as TXT",
            ExportFormat::Md => "Download as MD",
            ExportFormat::Docx => "Download as DOCX",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub body: Bytes,
}

impl Export {
    pub fn new(format: ExportFormat, rephrased_text: &str) -> Self {
        Self {
            format,
            body: Bytes::copy_from_slice(rephrased_text.as_bytes()),
        }
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.format.filename())
    }
}

/// Every download variant for one rephrased text.
pub fn all_exports(rephrased_text: &str) -> Vec<Export> {
    ExportFormat::ALL
        .iter()
        .map(|&format| Export::new(format, rephrased_text))
        .collect()
}
