//! Wire format of the model response and its structural validation.
//!
//! The model is asked for a JSON document shaped like:
//!
//! ```text
//! { summary, explanations: [{ lineNumber, code, explanation, type }],
//!   flowchart: { nodes: [{ id, type, position: {x, y}, data: { label } }],
//!                edges: [{ id, source, target, label? }] } }
//! ```
//!
//! Parsing is eager and strict: a document that fails any check is rejected as a
//! whole rather than rendered partially.

use crate::analysis::AnalysisResult;
use crate::explanation::CodeExplanation;
use crate::flowchart::{FlowNodeKind, Flowchart, FlowchartEdge, FlowchartNode, Position};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("response does not match the analysis schema: {0}")]
    Shape(String),
    #[error("explanation {index} has line number {line_number}; line numbers start at 1")]
    InvalidLineNumber { index: usize, line_number: u32 },
    #[error("flowchart {element} at position {index} has an empty id")]
    EmptyId { element: &'static str, index: usize },
    #[error("duplicate flowchart node id: {0}")]
    DuplicateNodeId(String),
    #[error("edge {edge} references unknown {end} node {node}")]
    DanglingEdge {
        edge: String,
        end: &'static str,
        node: String,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    summary: String,
    explanations: Vec<CodeExplanation>,
    flowchart: WireFlowchart,
}

#[derive(Deserialize)]
struct WireFlowchart {
    nodes: Vec<WireNode>,
    edges: Vec<WireEdge>,
}

#[derive(Deserialize)]
struct WireNode {
    id: String,
    #[serde(rename = "type")]
    kind: FlowNodeKind,
    position: Position,
    data: WireNodeData,
}

#[derive(Deserialize)]
struct WireNodeData {
    label: String,
}

#[derive(Deserialize)]
struct WireEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default)]
    label: Option<String>,
}

/// Parses and validates a model response body.
pub fn parse_analysis(body: &str) -> Result<AnalysisResult, SchemaError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SchemaError::NotJson(e.to_string()))?;
    let wire: WireAnalysis =
        serde_json::from_value(value).map_err(|e| SchemaError::Shape(e.to_string()))?;

    for (index, explanation) in wire.explanations.iter().enumerate() {
        if explanation.line_number < 1 {
            return Err(SchemaError::InvalidLineNumber {
                index,
                line_number: explanation.line_number,
            });
        }
    }

    let flowchart = validate_flowchart(wire.flowchart)?;

    Ok(AnalysisResult {
        summary: wire.summary,
        explanations: wire.explanations,
        flowchart: Arc::new(flowchart),
    })
}

fn validate_flowchart(wire: WireFlowchart) -> Result<Flowchart, SchemaError> {
    let mut seen = HashSet::with_capacity(wire.nodes.len());
    let mut nodes = Vec::with_capacity(wire.nodes.len());
    for (index, node) in wire.nodes.into_iter().enumerate() {
        if node.id.trim().is_empty() {
            return Err(SchemaError::EmptyId {
                element: "node",
                index,
            });
        }
        if !seen.insert(node.id.clone()) {
            return Err(SchemaError::DuplicateNodeId(node.id));
        }
        nodes.push(FlowchartNode {
            id: node.id,
            kind: node.kind,
            position: node.position,
            label: node.data.label,
        });
    }

    let mut edges = Vec::with_capacity(wire.edges.len());
    for (index, edge) in wire.edges.into_iter().enumerate() {
        if edge.id.trim().is_empty() {
            return Err(SchemaError::EmptyId {
                element: "edge",
                index,
            });
        }
        for (end, node) in [("source", &edge.source), ("target", &edge.target)] {
            if !seen.contains(node) {
                return Err(SchemaError::DanglingEdge {
                    edge: edge.id.clone(),
                    end,
                    node: node.clone(),
                });
            }
        }
        edges.push(FlowchartEdge {
            id: edge.id,
            source: edge.source,
            target: edge.target,
            label: edge.label.filter(|label| !label.trim().is_empty()),
        });
    }

    Ok(Flowchart { nodes, edges })
}
