//! Remote generation through a text-generation service
//!
//! The remote path never fails the caller. Every problem (transport error,
//! non-200 status, malformed payload, missing script markers) becomes a
//! [`RemoteOutcome::Fallback`] carrying the reason, and the generator runs
//! the template pipeline instead.
//!
//! ```text
//! CodeRequest ──► build_prompt ──► InferenceClient::send
//!                                        │
//!            ┌───────────────────────────┤
//!            ▼                           ▼
//!   transport error / !200      JSON array[0].generated_text
//!            │                           │
//!            │             strip echoed prompt, then
//!            │                 extract_script(start..=end)
//!            │                     │             │
//!            ▼                     ▼ missing     ▼ found
//!        Fallback(reason) ◄────────┘         Validated(script)
//! ```

pub mod client;
pub mod extract;
pub mod prompt;

use std::fmt;

use serde::Serialize;

use crate::request::CodeRequest;

pub use client::HttpInferenceClient;
pub use extract::{extract_script, MarkerError};
pub use prompt::build_prompt;

/// Sampling parameters sent with every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 1000,
            temperature: 0.7,
            do_sample: true,
        }
    }
}

/// Request body for the inference endpoint
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    pub inputs: String,
    pub parameters: GenerationParams,
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to complete the exchange at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Timeout, refused connection, DNS failure, truncated body
    Transport(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Transport to a text-generation service
pub trait InferenceClient: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Perform one request. Non-success statuses are returned, not raised.
    fn send(&self, request: &InferenceRequest) -> Result<RawResponse, ClientError>;
}

/// Why the remote path was abandoned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// AI generation not requested
    Disabled,
    /// No client configured (missing endpoint or required token)
    Unconfigured,
    Transport(String),
    Status(u16),
    MalformedPayload(String),
    /// Empty array, or missing/blank `generated_text`
    EmptyResult,
    /// Generated text contains no routine for the dialect
    MissingStartMarker,
    /// A routine opens but never closes
    MissingEndMarker,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Disabled => write!(f, "AI generation disabled"),
            FallbackReason::Unconfigured => write!(f, "AI service not configured"),
            FallbackReason::Transport(msg) => write!(f, "AI service unreachable: {}", msg),
            FallbackReason::Status(status) => write!(f, "AI service returned HTTP {}", status),
            FallbackReason::MalformedPayload(msg) => {
                write!(f, "AI service returned malformed payload: {}", msg)
            }
            FallbackReason::EmptyResult => write!(f, "AI service returned no generated text"),
            FallbackReason::MissingStartMarker => {
                write!(f, "AI output contains no recognizable script")
            }
            FallbackReason::MissingEndMarker => {
                write!(f, "AI output contains an unterminated script")
            }
        }
    }
}

/// Result of the remote path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Validated(String),
    Fallback(FallbackReason),
}

/// Pull `generated_text` out of `[{"generated_text": ...}, ...]`
fn parse_generated_text(body: &str) -> Result<String, FallbackReason> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FallbackReason::MalformedPayload(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or_else(|| FallbackReason::MalformedPayload("expected a JSON array".to_string()))?;
    let first = items.first().ok_or(FallbackReason::EmptyResult)?;

    match first.get("generated_text").and_then(|t| t.as_str()) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(FallbackReason::EmptyResult),
    }
}

/// Ask the service for a script and validate what comes back.
pub fn request_remote(
    client: &dyn InferenceClient,
    request: &CodeRequest,
    params: &GenerationParams,
) -> RemoteOutcome {
    let payload = InferenceRequest {
        inputs: build_prompt(request),
        parameters: params.clone(),
    };

    tracing::debug!(backend = client.name(), "requesting remote generation");
    let response = match client.send(&payload) {
        Ok(response) => response,
        Err(ClientError::Transport(msg)) => {
            return RemoteOutcome::Fallback(FallbackReason::Transport(msg))
        }
    };

    if response.status != 200 {
        return RemoteOutcome::Fallback(FallbackReason::Status(response.status));
    }

    let text = match parse_generated_text(&response.body) {
        Ok(text) => text,
        Err(reason) => return RemoteOutcome::Fallback(reason),
    };

    // text-generation endpoints may return the prompt followed by the reply
    let reply = text.strip_prefix(payload.inputs.as_str()).unwrap_or(&text);

    match extract_script(reply, request.dialect()) {
        Ok(script) => RemoteOutcome::Validated(script.to_string()),
        Err(MarkerError::MissingStart) => {
            RemoteOutcome::Fallback(FallbackReason::MissingStartMarker)
        }
        Err(MarkerError::MissingEnd) => RemoteOutcome::Fallback(FallbackReason::MissingEndMarker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Complexity, Dialect};
    use std::sync::Mutex;

    /// Replays one canned result and records the request it saw
    struct Canned {
        result: Result<RawResponse, ClientError>,
        seen: Mutex<Option<InferenceRequest>>,
    }

    impl Canned {
        fn new(result: Result<RawResponse, ClientError>) -> Self {
            Self {
                result,
                seen: Mutex::new(None),
            }
        }

        fn ok(status: u16, body: &str) -> Self {
            Self::new(Ok(RawResponse {
                status,
                body: body.to_string(),
            }))
        }
    }

    impl InferenceClient for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn send(&self, request: &InferenceRequest) -> Result<RawResponse, ClientError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.result.clone()
        }
    }

    fn vba_request() -> CodeRequest {
        CodeRequest::new("Make a pad", Dialect::Vba, Complexity::Intermediate).unwrap()
    }

    fn outcome(client: &Canned) -> RemoteOutcome {
        request_remote(client, &vba_request(), &GenerationParams::default())
    }

    #[test]
    fn test_validated_script() {
        let client = Canned::ok(
            200,
            r#"[{"generated_text": "VBA Code:\nSub Pad()\n    part.Update\nEnd Sub\nThanks"}]"#,
        );
        assert_eq!(
            outcome(&client),
            RemoteOutcome::Validated("Sub Pad()\n    part.Update\nEnd Sub".to_string())
        );
    }

    #[test]
    fn test_payload_carries_prompt_and_params() {
        let client = Canned::ok(503, "");
        outcome(&client);
        let seen = client.seen.lock().unwrap().clone().unwrap();
        assert!(seen.inputs.contains("Description: Make a pad"));
        assert_eq!(seen.parameters, GenerationParams::default());

        let json = serde_json::to_value(&seen).unwrap();
        assert_eq!(json["parameters"]["max_length"], 1000);
        assert_eq!(json["parameters"]["do_sample"], true);
    }

    #[test]
    fn test_status_failure() {
        let client = Canned::ok(503, "Service Unavailable");
        assert_eq!(
            outcome(&client),
            RemoteOutcome::Fallback(FallbackReason::Status(503))
        );
    }

    #[test]
    fn test_transport_failure() {
        let client = Canned::new(Err(ClientError::Transport("timed out".to_string())));
        assert_eq!(
            outcome(&client),
            RemoteOutcome::Fallback(FallbackReason::Transport("timed out".to_string()))
        );
    }

    #[test]
    fn test_malformed_payloads() {
        for body in ["not json", r#"{"generated_text": "Sub A()\nEnd Sub"}"#, "42"] {
            let client = Canned::ok(200, body);
            assert!(
                matches!(
                    outcome(&client),
                    RemoteOutcome::Fallback(FallbackReason::MalformedPayload(_))
                ),
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn test_empty_results() {
        for body in ["[]", r#"[{}]"#, r#"[{"generated_text": "  "}]"#, r#"[{"generated_text": 7}]"#] {
            let client = Canned::ok(200, body);
            assert_eq!(
                outcome(&client),
                RemoteOutcome::Fallback(FallbackReason::EmptyResult),
                "body {:?}",
                body
            );
        }
    }

    #[test]
    fn test_missing_marker() {
        let client = Canned::ok(200, r#"[{"generated_text": "I am a chatbot."}]"#);
        assert_eq!(
            outcome(&client),
            RemoteOutcome::Fallback(FallbackReason::MissingStartMarker)
        );
    }

    #[test]
    fn test_truncated_routine() {
        let client = Canned::ok(
            200,
            r#"[{"generated_text": "Sub MakePad()\n    Dim part As Part\n    Set part = CATIA.Act"}]"#,
        );
        assert_eq!(
            outcome(&client),
            RemoteOutcome::Fallback(FallbackReason::MissingEndMarker)
        );
    }

    /// Returns the prompt followed by a fixed reply, like hosted text-generation models
    struct Echo(&'static str);

    impl InferenceClient for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn send(&self, request: &InferenceRequest) -> Result<RawResponse, ClientError> {
            let text = format!("{}{}", request.inputs, self.0);
            let body = serde_json::json!([{ "generated_text": text }]).to_string();
            Ok(RawResponse { status: 200, body })
        }
    }

    #[test]
    fn test_echoed_prompt_is_not_a_script() {
        let request = CodeRequest::new(
            "Create a part\nimport the STEP file and pad it",
            Dialect::Python,
            Complexity::Basic,
        )
        .unwrap();
        let outcome = request_remote(
            &Echo("Sorry, I cannot help."),
            &request,
            &GenerationParams::default(),
        );
        assert_eq!(outcome, RemoteOutcome::Fallback(FallbackReason::MissingStartMarker));

        let request =
            CodeRequest::new("pad it\nSub Main() please", Dialect::Vba, Complexity::Basic).unwrap();
        let outcome = request_remote(&Echo("No."), &request, &GenerationParams::default());
        assert_eq!(outcome, RemoteOutcome::Fallback(FallbackReason::MissingStartMarker));
    }

    #[test]
    fn test_echoed_prompt_then_script() {
        let request = CodeRequest::new("Make a pad", Dialect::Vba, Complexity::Basic).unwrap();
        let outcome = request_remote(
            &Echo("Sub Pad()\n    part.Update\nEnd Sub"),
            &request,
            &GenerationParams::default(),
        );
        assert_eq!(
            outcome,
            RemoteOutcome::Validated("Sub Pad()\n    part.Update\nEnd Sub".to_string())
        );
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&FallbackReason::Status(500)).unwrap();
        assert_eq!(json, r#"{"kind":"status","detail":500}"#);
        let json = serde_json::to_string(&FallbackReason::Disabled).unwrap();
        assert_eq!(json, r#"{"kind":"disabled"}"#);
    }
}
