//! Submission transport
//!
//! Exactly one POST per submission. Any non-2xx status or transport failure
//! is returned as-is; nothing is retried.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EndpointConfig;
use crate::payload::SubmissionPayload;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

/// Delivers a submission payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: SubmissionPayload) -> Result<TransportResponse, TransportError>;
}

/// Posts the payload as `multipart/form-data` to `{base_url}/sendemail`.
pub struct SendEmailClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SendEmailClient {
    pub fn new(config: &EndpointConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &EndpointConfig, client: reqwest::Client) -> Self {
        Self { endpoint: config.send_email_url(), client }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for SendEmailClient {
    async fn send(&self, payload: SubmissionPayload) -> Result<TransportResponse, TransportError> {
        let entries = payload.len();
        let files = payload.file_count();
        let form = payload.into_multipart()?;

        debug!(endpoint = %self.endpoint, entries, files, "posting submission");
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "submission rejected");
            return Err(TransportError::Status { status: status.as_u16(), body });
        }
        Ok(TransportResponse { status: status.as_u16() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Deployment;
    use crate::domain::state::FormState;
    use crate::domain::value_objects::Attachment;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SendEmailClient {
        let config = EndpointConfig::new(Deployment::Development, server.uri());
        SendEmailClient::new(&config)
    }

    fn payload() -> SubmissionPayload {
        let state = FormState { client_name: "Acme".into(), ..FormState::default() };
        let files = vec![Attachment::new("brief.pdf", b"%PDF-1.7".to_vec())];
        SubmissionPayload::build(&state, &files)
    }

    #[tokio::test]
    async fn test_posts_multipart_to_sendemail() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendemail"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"clientName\""))
            .and(body_string_contains("Acme"))
            .and(body_string_contains("filename=\"brief.pdf\""))
            .and(body_string_contains("%PDF-1.7"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).send(payload()).await.unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_any_2xx_is_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendemail"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).send(payload()).await.unwrap();
        assert_eq!(response.status, 202);
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_error_and_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendemail"))
            .respond_with(ResponseTemplate::new(503).set_body_string("relay down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).send(payload()).await.unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "relay down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = EndpointConfig::new(Deployment::Development, format!("http://127.0.0.1:{}", port));
        let client = SendEmailClient::new(&config);

        let err = client.send(payload()).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[test]
    fn test_endpoint() {
        let config = EndpointConfig::new(Deployment::Production, "https://mail.example.com/");
        let client = SendEmailClient::new(&config);
        assert_eq!(client.endpoint(), "https://mail.example.com/sendemail");
    }
}
