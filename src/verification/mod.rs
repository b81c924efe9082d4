//! Step external verification: gating progression on an HTTP check.
//!
//! A [`VerificationSession`] is a plain value owned by whoever drives one
//! form run; construct it where it is needed and pass it along instead of
//! sharing it behind a global. The session assembles the request from the
//! step's configuration and current values, interprets the gateway's answer,
//! and keeps a bounded attempt history for audit and preview.

mod gateway;

pub use gateway::{GatewayRequest, GatewayResponse, HttpGateway};

use std::collections::VecDeque;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{GatewayError, VerificationError};
use crate::model::{FormConfig, StepVerification, Value, ValueMap, VerifyMethod};

/// Most-recent-first attempt history is capped at this many entries.
pub const HISTORY_LIMIT: usize = 10;

const GENERIC_ERROR: &str = "Verification failed";
const GENERIC_SUCCESS: &str = "Verification succeeded";
const SERVER_ERROR: &str = "Server error, please retry";

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    #[default]
    Idle,
    Validating,
    Success,
    Failure,
}

/// One recorded verification attempt, success or failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationAttempt {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub method: VerifyMethod,
    pub request: AHashMap<String, Value>,
    pub response: serde_json::Value,
    pub success: bool,
}

/// What a step-transition attempt resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Whether the caller may advance past the step. A failed check still
    /// allows progression unless the step demands a successful one.
    pub allowed: bool,
    /// Whether the check itself succeeded (vacuously true without a check).
    pub success: bool,
    pub message: Option<String>,
}

impl VerificationOutcome {
    fn pass_through() -> Self {
        Self {
            allowed: true,
            success: true,
            message: None,
        }
    }
}

/// Per-context verification state: status, messages, attempt history.
#[derive(Debug, Default)]
pub struct VerificationSession {
    status: VerificationStatus,
    success_message: Option<String>,
    error_message: Option<String>,
    history: VecDeque<VerificationAttempt>,
}

impl VerificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn is_validating(&self) -> bool {
        self.status == VerificationStatus::Validating
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Attempt history, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &VerificationAttempt> {
        self.history.iter()
    }

    pub fn clear_messages(&mut self) {
        self.success_message = None;
        self.error_message = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Runs the verification configured on `step_id`, if any, and decides
    /// whether progression past the step is allowed.
    ///
    /// `values` is keyed by field **name** (the data-binding key), matching
    /// submission data. Only one attempt may run per session at a time;
    /// firing a second while one is in flight is a caller error.
    pub async fn verify_step(
        &mut self,
        config: &FormConfig,
        step_id: &str,
        values: &ValueMap,
        gateway: &dyn HttpGateway,
    ) -> Result<VerificationOutcome, VerificationError> {
        let step = config
            .find_step(step_id)
            .ok_or_else(|| VerificationError::StepNotFound(step_id.to_string()))?;
        let Some(check) = &step.verification else {
            return Ok(VerificationOutcome::pass_through());
        };
        if !check.is_active() {
            return Ok(VerificationOutcome::pass_through());
        }
        if self.is_validating() {
            return Err(VerificationError::AlreadyRunning);
        }

        self.status = VerificationStatus::Validating;
        self.clear_messages();

        let params = assemble_params(check, config, values);
        let request = GatewayRequest {
            method: check.method,
            endpoint: check.endpoint.clone(),
            headers: assemble_headers(check),
            params: params.clone(),
        };

        log::debug!(
            "verifying step '{}' against {} {}",
            step_id,
            check.method,
            check.endpoint
        );

        let outcome = match gateway.dispatch(request).await {
            Ok(response) if response.success => {
                let message = check
                    .success_message
                    .clone()
                    .unwrap_or_else(|| GENERIC_SUCCESS.to_string());
                self.status = VerificationStatus::Success;
                self.success_message = Some(message.clone());
                self.record(check, params, response_json(&response), true);
                VerificationOutcome {
                    allowed: true,
                    success: true,
                    message: Some(message),
                }
            }
            Ok(response) => {
                let message = response
                    .message
                    .clone()
                    .or_else(|| check.error_message.clone())
                    .unwrap_or_else(|| GENERIC_ERROR.to_string());
                self.fail(check, params, response_json(&response), message.clone());
                VerificationOutcome {
                    allowed: !check.validation_required,
                    success: false,
                    message: Some(message),
                }
            }
            Err(error) => {
                let message = categorize_error(&error, check);
                self.fail(check, params, error_json(&error), message.clone());
                VerificationOutcome {
                    allowed: !check.validation_required,
                    success: false,
                    message: Some(message),
                }
            }
        };

        Ok(outcome)
    }

    fn fail(
        &mut self,
        check: &StepVerification,
        params: AHashMap<String, Value>,
        response: serde_json::Value,
        message: String,
    ) {
        log::warn!("step verification failed: {}", message);
        self.status = VerificationStatus::Failure;
        self.error_message = Some(message);
        self.record(check, params, response, false);
    }

    fn record(
        &mut self,
        check: &StepVerification,
        request: AHashMap<String, Value>,
        response: serde_json::Value,
        success: bool,
    ) {
        self.history.push_front(VerificationAttempt {
            timestamp: Utc::now(),
            endpoint: check.endpoint.clone(),
            method: check.method,
            request,
            response,
            success,
        });
        self.history.truncate(HISTORY_LIMIT);
    }
}

/// Static parameters first, then field mappings on top; a mapping whose
/// source value is missing is skipped rather than sent as null.
fn assemble_params(
    check: &StepVerification,
    config: &FormConfig,
    values: &ValueMap,
) -> AHashMap<String, Value> {
    let mut params = check.static_params.clone();
    let names = config.field_name_index();

    for mapping in &check.field_mappings {
        let Some(name) = names.get(&mapping.field_id) else {
            log::warn!(
                "field mapping '{}' references an unknown field '{}'",
                mapping.parameter_name,
                mapping.field_id
            );
            continue;
        };
        if let Some(value) = values.get(name) {
            params.insert(mapping.parameter_name.clone(), value.clone());
        }
    }

    params
}

fn assemble_headers(check: &StepVerification) -> AHashMap<String, String> {
    let mut headers = AHashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.extend(check.headers.clone());
    headers
}

/// Maps a gateway failure to the message the user sees, by status class.
fn categorize_error(error: &GatewayError, check: &StepVerification) -> String {
    match error {
        GatewayError::Http {
            status: status @ (400 | 422),
            message,
            payload,
        } => payload_message(payload)
            .or_else(|| message.clone())
            .unwrap_or_else(|| {
                if *status == 422 {
                    "Invalid data".to_string()
                } else {
                    "Invalid request".to_string()
                }
            }),
        GatewayError::Http { status, .. } if *status >= 500 => SERVER_ERROR.to_string(),
        _ => check
            .error_message
            .clone()
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
    }
}

fn payload_message(payload: &Option<serde_json::Value>) -> Option<String> {
    payload
        .as_ref()
        .and_then(|p| p.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

fn response_json(response: &GatewayResponse) -> serde_json::Value {
    response
        .data
        .clone()
        .unwrap_or_else(|| serde_json::json!({ "success": response.success, "message": response.message }))
}

fn error_json(error: &GatewayError) -> serde_json::Value {
    match error {
        GatewayError::Http {
            status,
            message,
            payload,
        } => serde_json::json!({
            "error": message.clone().unwrap_or_else(|| "request rejected".to_string()),
            "statusCode": status,
            "data": payload,
        }),
        GatewayError::Transport(message) => serde_json::json!({ "error": message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverGateway;

    #[async_trait::async_trait]
    impl HttpGateway for NeverGateway {
        async fn dispatch(
            &self,
            _request: GatewayRequest,
        ) -> Result<GatewayResponse, GatewayError> {
            panic!("dispatch must not be reached while a session is busy");
        }
    }

    /// The busy latch is only observable mid-flight, so it is tested here
    /// with direct access to the private status.
    #[tokio::test]
    async fn busy_session_rejects_reentry() {
        let mut ids = crate::id::IdGenerator::new();
        let mut config = crate::model::FormConfig::empty(&mut ids);
        let step_id = config.steps[0].id.clone();
        config.steps[0].verification =
            Some(StepVerification::new("https://api.example.com/check"));

        let mut session = VerificationSession::new();
        session.status = VerificationStatus::Validating;

        let result = session
            .verify_step(&config, &step_id, &ValueMap::new(), &NeverGateway)
            .await;
        assert_eq!(result.unwrap_err(), VerificationError::AlreadyRunning);
    }
}
