use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod analysis;
pub mod explanation;
pub mod flowchart;
pub mod schema;

pub use analysis::AnalysisResult;
pub use explanation::{CodeExplanation, ExplanationKind};
pub use flowchart::{FlowNodeKind, Flowchart, FlowchartEdge, FlowchartNode, Position};
pub use schema::SchemaError;

/// Correlates one orchestration cycle across logs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Code submitted for analysis. The text is opaque: it is never parsed or executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub code: String,
}

impl AnalysisRequest {
    /// Returns `None` for empty or whitespace-only code.
    pub fn new(code: &str) -> Option<Self> {
        if code.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: RequestId::new(),
            code: code.to_string(),
        })
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumConversionError {
    #[error("Invalid explanation kind: {0}")]
    InvalidExplanationKind(String),
    #[error("Invalid node kind: {0}")]
    InvalidNodeKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_code_is_not_a_request() {
        assert!(AnalysisRequest::new("").is_none());
        assert!(AnalysisRequest::new("   \n\t  ").is_none());
    }

    #[test]
    fn test_request_keeps_code_verbatim() {
        let code = "  fn main() {}\n";
        let request = AnalysisRequest::new(code).unwrap();
        assert_eq!(request.code, code);
        assert_eq!(request.line_count(), 1);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = AnalysisRequest::new("x").unwrap();
        let b = AnalysisRequest::new("x").unwrap();
        assert_ne!(a.id, b.id);
    }
}
