pub mod action;
pub mod config;

use serde::Serialize;
use threadpilot_client::ActionError;

/// Terminal result of one invocation: the JSON document printed to stdout
/// plus the process exit code.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// Stdout payload. The server's answer is carried as typed fields:
/// `status_code` and `url` are set exactly when the server rejected the
/// request, `detail` when the failure happened before or below HTTP.
#[derive(Debug, Serialize)]
struct ActionReport<'a> {
    action: &'a str,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Accepted,
    InvalidPostId,
    ServerRejected,
    TransportFailed,
    StartupFailed,
}

impl CommandResult {
    pub fn accepted(action: &str) -> Self {
        Self::render(
            0,
            ActionReport {
                action,
                outcome: Outcome::Accepted,
                status_code: None,
                url: None,
                detail: None,
            },
        )
    }

    pub fn invalid_post_id(action: &str, detail: impl Into<String>) -> Self {
        Self::render(
            1,
            ActionReport {
                action,
                outcome: Outcome::InvalidPostId,
                status_code: None,
                url: None,
                detail: Some(detail.into()),
            },
        )
    }

    pub fn action_failed(action: &str, error: &ActionError) -> Self {
        let report = match error {
            ActionError::RequestFailed { status_code, url, .. } => ActionReport {
                action,
                outcome: Outcome::ServerRejected,
                status_code: Some(*status_code),
                url: Some(url),
                detail: None,
            },
            ActionError::Transport(transport) => ActionReport {
                action,
                outcome: Outcome::TransportFailed,
                status_code: None,
                url: None,
                detail: Some(transport.to_string()),
            },
        };
        Self::render(1, report)
    }

    /// Failures before any action ran: config loading, transport construction.
    pub fn startup_failed(stage: &str, detail: impl Into<String>) -> Self {
        Self::render(
            1,
            ActionReport {
                action: stage,
                outcome: Outcome::StartupFailed,
                status_code: None,
                url: None,
                detail: Some(detail.into()),
            },
        )
    }

    fn render(exit_code: u8, report: ActionReport<'_>) -> Self {
        let output = serde_json::to_string(&report)
            .unwrap_or_else(|_| r#"{"action":"unknown","outcome":"report_unserializable"}"#.into());
        Self { exit_code, output }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use threadpilot_client::ActionError;

    use super::CommandResult;

    fn payload(result: &CommandResult) -> Value {
        serde_json::from_str(&result.output).expect("command output should be valid JSON")
    }

    #[test]
    fn acceptance_omits_failure_fields() {
        let result = CommandResult::accepted("summarize");
        let payload = payload(&result);

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["action"], "summarize");
        assert_eq!(payload["outcome"], "accepted");
        assert!(payload.get("status_code").is_none());
        assert!(payload.get("url").is_none());
        assert!(payload.get("detail").is_none());
    }

    #[test]
    fn server_rejection_carries_typed_status_and_url() {
        let error = ActionError::RequestFailed {
            status_code: 403,
            url: "/plugins/ai-actions/react/xyz".to_string(),
            message: String::new(),
        };
        let result = CommandResult::action_failed("react", &error);
        let payload = payload(&result);

        assert_eq!(result.exit_code, 1);
        assert_eq!(payload["outcome"], "server_rejected");
        assert_eq!(payload["status_code"], 403);
        assert_eq!(payload["url"], "/plugins/ai-actions/react/xyz");
        assert!(payload.get("detail").is_none());
    }

    #[test]
    fn startup_failure_names_the_stage() {
        let result = CommandResult::startup_failed("config", "missing file");
        let payload = payload(&result);

        assert_eq!(result.exit_code, 1);
        assert_eq!(payload["action"], "config");
        assert_eq!(payload["outcome"], "startup_failed");
        assert_eq!(payload["detail"], "missing file");
    }
}
