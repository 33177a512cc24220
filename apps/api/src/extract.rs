//! Text extraction for uploaded résumés.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Uploaded text is not valid UTF-8")]
    Encoding,

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("No text could be extracted from the document")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Content type wins over the file extension when both are present.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, ExtractError> {
        match content_type.map(|c| c.split(';').next().unwrap_or(c).trim()) {
            Some("application/pdf") => return Ok(DocumentKind::Pdf),
            Some("text/plain") => return Ok(DocumentKind::PlainText),
            _ => {}
        }

        let extension = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") => Ok(DocumentKind::PlainText),
            _ => Err(ExtractError::Unsupported(
                content_type.or(file_name).unwrap_or("unknown").to_string(),
            )),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::PlainText => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain",
        }
    }
}

/// Concatenates per-page text, each page ending in a newline.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page.trim_end());
        text.push('\n');
    }
    text
}

/// Extracts plain text from an uploaded document.
/// PDF parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(kind: DocumentKind, bytes: Bytes) -> Result<String, ExtractError> {
    let text = match kind {
        DocumentKind::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::Encoding)?
        }
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map(|pages| join_pages(&pages))
                .map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await
        // pdf-extract panics on some malformed inputs
        .map_err(|e| ExtractError::Pdf(e.to_string()))??,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    debug!("Extracted {} characters from {:?} upload", text.chars().count(), kind);
    Ok(text)
}
