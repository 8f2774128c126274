//! HTTP inference client
//!
//! Posts the prompt to a text-generation endpoint with `ureq`. Non-2xx
//! responses are returned as data, not errors; only transport failures
//! (timeout, refused connection, DNS) become [`ClientError`].

use std::time::Duration;

use super::{ClientError, InferenceClient, InferenceRequest, RawResponse};

/// Blocking client for a Hugging Face style inference endpoint
pub struct HttpInferenceClient {
    agent: ureq::Agent,
    endpoint: String,
    token: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpInferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInferenceClient")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl InferenceClient for HttpInferenceClient {
    fn name(&self) -> &str {
        "http"
    }

    fn send(&self, request: &InferenceRequest) -> Result<RawResponse, ClientError> {
        let mut call = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json");
        if let Some(token) = &self.token {
            call = call.set("Authorization", &format!("Bearer {}", token));
        }

        match call.send_json(request) {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|e| ClientError::Transport(format!("failed to read body: {}", e)))?;
                Ok(RawResponse { status, body })
            }
            Err(ureq::Error::Status(status, response)) => Ok(RawResponse {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => {
                Err(ClientError::Transport(transport.to_string()))
            }
        }
    }
}
