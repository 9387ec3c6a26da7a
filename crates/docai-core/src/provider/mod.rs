//! Document-analysis provider interface.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpDocumentProvider;

use crate::error::ProviderError;
use crate::models::document::Document;
use crate::storage::MimeType;

/// Trait for services that turn raw document bytes into a [`Document`].
pub trait DocumentProvider {
    /// Analyze `content` of type `mime` and return text plus form fields.
    fn process(&self, content: &[u8], mime: MimeType) -> Result<Document, ProviderError>;
}

impl<P: DocumentProvider + ?Sized> DocumentProvider for &P {
    fn process(&self, content: &[u8], mime: MimeType) -> Result<Document, ProviderError> {
        (**self).process(content, mime)
    }
}

impl<P: DocumentProvider + ?Sized> DocumentProvider for Box<P> {
    fn process(&self, content: &[u8], mime: MimeType) -> Result<Document, ProviderError> {
        (**self).process(content, mime)
    }
}
