//! Professional-profile document parsing (HTML or PDF export).

pub mod handlers;
pub mod html;
pub mod pdf;

use thiserror::Error;

use crate::models::profile::ProfileDocument;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("could not read PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Html,
    Pdf,
}

impl DocumentKind {
    /// PDF when the content type, extension or magic bytes say so; HTML otherwise.
    pub fn detect(content_type: Option<&str>, filename: Option<&str>, bytes: &[u8]) -> Self {
        let declared_pdf = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"));
        let named_pdf = filename.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
        if declared_pdf || named_pdf || bytes.starts_with(b"%PDF") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Html
        }
    }
}

pub fn parse_profile(bytes: &[u8], kind: DocumentKind) -> Result<ProfileDocument, ProfileError> {
    match kind {
        DocumentKind::Pdf => pdf::parse_profile_pdf(bytes),
        // Invalid byte sequences become U+FFFD; unreadable parts simply match no section.
        DocumentKind::Html => Ok(html::parse_profile_html(&String::from_utf8_lossy(bytes))),
    }
}
