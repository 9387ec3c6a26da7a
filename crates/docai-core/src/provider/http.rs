//! Blocking HTTP client for a form-parsing processor endpoint.

use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProviderError;
use crate::models::config::ProviderConfig;
use crate::models::document::Document;
use crate::storage::MimeType;

use super::DocumentProvider;

/// Provider that posts raw documents to `<endpoint>/v1/<processor>:process`.
pub struct HttpDocumentProvider {
    client: Client,
    url: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    document: Document,
}

impl HttpDocumentProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: process_url(config),
            access_token: config.access_token.clone(),
        })
    }

    /// URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DocumentProvider for HttpDocumentProvider {
    fn process(&self, content: &[u8], mime: MimeType) -> Result<Document, ProviderError> {
        let body = encode_request(content, mime);

        info!("Submitting {} bytes ({}) to {}", content.len(), mime, self.url);

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let document = decode_response(&text)?;

        debug!(
            "Provider returned {} chars of text and {} form fields",
            document.text.len(),
            document.form_field_count()
        );
        Ok(document)
    }
}

fn process_url(config: &ProviderConfig) -> String {
    format!(
        "{}/v1/{}:process",
        config.endpoint.trim_end_matches('/'),
        config.processor_name()
    )
}

fn encode_request(content: &[u8], mime: MimeType) -> ProcessRequest<'static> {
    ProcessRequest {
        raw_document: RawDocument {
            content: base64::engine::general_purpose::STANDARD.encode(content),
            mime_type: mime.as_str(),
        },
    }
}

fn decode_response(body: &str) -> Result<Document, ProviderError> {
    serde_json::from_str::<ProcessResponse>(body)
        .map(|r| r.document)
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_url() {
        let config = ProviderConfig {
            endpoint: "https://eu-documentai.example.com/".into(),
            project_id: "acme".into(),
            location: "eu".into(),
            processor_id: "f00".into(),
            ..ProviderConfig::default()
        };

        assert_eq!(
            process_url(&config),
            "https://eu-documentai.example.com/v1/projects/acme/locations/eu/processors/f00:process"
        );
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(encode_request(b"%PDF", MimeType::Pdf)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"rawDocument": {"content": "JVBERg==", "mimeType": "application/pdf"}})
        );
    }

    #[test]
    fn test_decode_response() {
        let body = r#"{"document": {"text": "Date\n", "pages": [{"formFields": []}]}, "humanReviewStatus": {}}"#;
        let document = decode_response(body).unwrap();
        assert_eq!(document.text, "Date\n");
        assert_eq!(document.pages.len(), 1);

        assert!(matches!(decode_response("<html>"), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn test_new_provider() {
        let provider = HttpDocumentProvider::new(&ProviderConfig::default()).unwrap();
        assert!(provider.url().ends_with("/processors/:process"));
    }
}
