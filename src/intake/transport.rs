//! How the intake form reaches the relay.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::inquiry::{InquiryPayload, ResponseEnvelope};

/// Delivers one payload to the relay and returns its envelope.
#[async_trait]
pub trait InquiryTransport: Send + Sync {
    async fn submit(&self, payload: &InquiryPayload) -> Result<ResponseEnvelope, TransportError>;
}

/// Posts inquiries as JSON to the relay's intake URL.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl InquiryTransport for HttpTransport {
    async fn submit(&self, payload: &InquiryPayload) -> Result<ResponseEnvelope, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        match serde_json::from_slice::<ResponseEnvelope>(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
            }),
            Err(e) => Err(TransportError::InvalidResponse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> InquiryPayload {
        InquiryPayload::new("Kim", "010-1234-5678", "Hannam-dong", "50py")
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/inquiry"))
            .and(body_json(serde_json::json!({
                "name": "Kim",
                "contact": "010-1234-5678",
                "location": "Hannam-dong",
                "area": "50py"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(format!("{}/api/inquiry", server.uri()));
        let envelope = transport.submit(&sample()).await.unwrap();
        assert_eq!(envelope, ResponseEnvelope::accepted());
    }

    #[tokio::test]
    async fn error_status_with_envelope_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"success": false, "error": "oops"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri());
        let envelope = transport.submit(&sample()).await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("oops"));
    }

    #[tokio::test]
    async fn error_status_without_envelope_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri());
        let err = transport.submit(&sample()).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502 }));
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri());
        let err = transport.submit(&sample()).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }
}
