use codeflow_core::SchemaError;
use codeflow_events::FailureKind;
use codeflow_storage::StorageError;
use thiserror::Error;

/// Failure of the outbound model call itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("the model service rejected the API key ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("the model service quota is exhausted: {0}")]
    QuotaExceeded(String),
    #[error("the model service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("the model declined to answer: {0}")]
    Blocked(String),
    #[error("the model returned an empty response")]
    EmptyResponse,
    #[error("the request timed out")]
    TimedOut,
    #[error("unreadable service response: {0}")]
    InvalidBody(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Why an analysis cycle failed. Recorded as the error arm of the outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed analysis response: {0}")]
    MalformedResponse(#[from] SchemaError),
    #[error("the analysis did not finish in time")]
    TimedOut,
    #[error("the analysis was cancelled")]
    Cancelled,
    #[error("analysis worker failed: {0}")]
    Worker(String),
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::Transport(TransportError::TimedOut) | AnalysisError::TimedOut => {
                FailureKind::TimedOut
            }
            AnalysisError::Transport(_) | AnalysisError::Worker(_) => FailureKind::Transport,
            AnalysisError::MalformedResponse(_) => FailureKind::MalformedResponse,
            AnalysisError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Short message suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport(TransportError::Unauthorized { .. }) => {
                "The API key was rejected. Check it and try again.".to_string()
            }
            AnalysisError::Transport(TransportError::QuotaExceeded(_)) => {
                "The API quota is exhausted. Try again later.".to_string()
            }
            AnalysisError::MalformedResponse(_) => {
                "The model returned a response that could not be understood.".to_string()
            }
            AnalysisError::TimedOut | AnalysisError::Transport(TransportError::TimedOut) => {
                "The analysis took too long and was stopped.".to_string()
            }
            AnalysisError::Cancelled => "The analysis was cancelled.".to_string(),
            other => format!("Analysis failed: {other}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("an analysis is already in progress")]
    Busy,
    #[error("credential store error: {0}")]
    Credential(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            AnalysisError::from(TransportError::EmptyResponse).kind(),
            FailureKind::Transport
        );
        assert_eq!(
            AnalysisError::from(TransportError::TimedOut).kind(),
            FailureKind::TimedOut
        );
        assert_eq!(
            AnalysisError::from(SchemaError::DuplicateNodeId("1".into())).kind(),
            FailureKind::MalformedResponse
        );
        assert_eq!(AnalysisError::Cancelled.kind(), FailureKind::Cancelled);
    }

    #[test]
    fn test_user_messages_do_not_leak_details() {
        let err = AnalysisError::from(TransportError::Unauthorized {
            status: 403,
            message: "API key AIza... invalid".to_string(),
        });
        assert!(!err.user_message().contains("AIza"));
    }
}
