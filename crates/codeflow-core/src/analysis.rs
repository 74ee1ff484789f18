use crate::explanation::CodeExplanation;
use crate::flowchart::Flowchart;
use crate::schema::{self, SchemaError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one successful analysis cycle. The flowchart sits behind an `Arc`
/// so renderers can detect a new graph by pointer identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub explanations: Vec<CodeExplanation>,
    pub flowchart: Arc<Flowchart>,
}

impl AnalysisResult {
    pub fn from_json(body: &str) -> Result<Self, SchemaError> {
        schema::parse_analysis(body)
    }

    pub fn graph(&self) -> Arc<Flowchart> {
        Arc::clone(&self.flowchart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_shares_identity() {
        let result = AnalysisResult {
            summary: String::new(),
            explanations: Vec::new(),
            flowchart: Arc::new(Flowchart::fallback()),
        };
        assert!(Arc::ptr_eq(&result.graph(), &result.flowchart));

        let copy = result.clone();
        assert!(Arc::ptr_eq(&copy.flowchart, &result.flowchart));
    }
}
