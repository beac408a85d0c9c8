use thiserror::Error;

/// The one error kind at the agent-client boundary.
///
/// Transport failures, non-2xx statuses and body-decode failures all collapse
/// into a single message-bearing variant; callers surface the message and let
/// the user resubmit. There is no retry and no structured code.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    RequestFailed { message: String },
}

impl ClientError {
    /// Non-2xx response: keep the status and whatever the body said.
    pub fn http(status: reqwest::StatusCode, body: &str) -> Self {
        ClientError::RequestFailed {
            message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClientError::RequestFailed { message } => message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::RequestFailed {
            message: err.to_string(),
        }
    }
}
