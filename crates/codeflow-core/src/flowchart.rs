use crate::EnumConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Node role in the flow graph. `input` is a start node, `output` an end node,
/// `default` a process or decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeKind {
    Input,
    Default,
    Output,
}

impl FlowNodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowNodeKind::Input => "input",
            FlowNodeKind::Default => "default",
            FlowNodeKind::Output => "output",
        }
    }

    /// Whether edges may leave a node of this kind.
    pub fn has_exit(&self) -> bool {
        !matches!(self, FlowNodeKind::Output)
    }

    /// Whether edges may enter a node of this kind.
    pub fn has_entry(&self) -> bool {
        !matches!(self, FlowNodeKind::Input)
    }
}

impl fmt::Display for FlowNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowNodeKind {
    type Err = EnumConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "input" => Ok(FlowNodeKind::Input),
            "default" => Ok(FlowNodeKind::Default),
            "output" => Ok(FlowNodeKind::Output),
            other => Err(EnumConversionError::InvalidNodeKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartNode {
    pub id: String,
    pub kind: FlowNodeKind,
    pub position: Position,
    pub label: String,
}

impl FlowchartNode {
    pub fn new(id: impl Into<String>, kind: FlowNodeKind, position: Position, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            label: label.into(),
        }
    }

    /// A decision is a `default` node whose label contains `?` or `if` in any
    /// case, anywhere in the text. Presentation only.
    pub fn is_decision(&self) -> bool {
        self.kind == FlowNodeKind::Default && label_reads_as_decision(&self.label)
    }
}

pub fn label_reads_as_decision(label: &str) -> bool {
    label.contains('?') || label.to_lowercase().contains("if")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

impl FlowchartEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flowchart {
    pub nodes: Vec<FlowchartNode>,
    pub edges: Vec<FlowchartEdge>,
}

impl Flowchart {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&FlowchartNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Fixed five-node graph shown when no analysis result is available.
    pub fn fallback() -> Self {
        let nodes = vec![
            FlowchartNode::new("1", FlowNodeKind::Input, Position::new(250.0, 0.0), "Start: fibonacci(n)"),
            FlowchartNode::new("2", FlowNodeKind::Default, Position::new(250.0, 100.0), "n <= 1?"),
            FlowchartNode::new("3", FlowNodeKind::Output, Position::new(100.0, 200.0), "Return n"),
            FlowchartNode::new(
                "4",
                FlowNodeKind::Default,
                Position::new(400.0, 200.0),
                "Calculate fibonacci(n-1) + fibonacci(n-2)",
            ),
            FlowchartNode::new("5", FlowNodeKind::Output, Position::new(400.0, 300.0), "Return result"),
        ];
        let edges = vec![
            FlowchartEdge::new("e1-2", "1", "2"),
            FlowchartEdge::new("e2-3", "2", "3").with_label("Yes"),
            FlowchartEdge::new("e2-4", "2", "4").with_label("No"),
            FlowchartEdge::new("e4-5", "4", "5"),
        ];
        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_node(label: &str) -> FlowchartNode {
        FlowchartNode::new("n", FlowNodeKind::Default, Position::default(), label)
    }

    #[test]
    fn test_decision_heuristic() {
        assert!(default_node("n <= 1?").is_decision());
        assert!(default_node("If x > 0").is_decision());
        assert!(default_node("check (if empty)").is_decision());
        assert!(!default_node("Calculate sum").is_decision());
    }

    #[test]
    fn test_decision_matches_if_inside_words() {
        assert!(default_node("Verify input").is_decision());
        assert!(default_node("Modify list").is_decision());
        assert!(default_node("Check elif branch").is_decision());
        assert!(default_node("IF ready").is_decision());
        assert!(!default_node("Return result").is_decision());
    }

    #[test]
    fn test_only_default_nodes_are_decisions() {
        let node = FlowchartNode::new("n", FlowNodeKind::Input, Position::default(), "Ready?");
        assert!(!node.is_decision());
    }

    #[test]
    fn test_fallback_shape() {
        let graph = Flowchart::fallback();
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.edges.len(), 4);
        let inputs = graph.nodes.iter().filter(|n| n.kind == FlowNodeKind::Input).count();
        let outputs = graph.nodes.iter().filter(|n| n.kind == FlowNodeKind::Output).count();
        assert_eq!(inputs, 1);
        assert_eq!(outputs, 2);
        for edge in &graph.edges {
            assert!(graph.node(&edge.source).is_some());
            assert!(graph.node(&edge.target).is_some());
        }
        assert!(graph.node("2").unwrap().is_decision());
    }

    #[test]
    fn test_anchor_availability() {
        assert!(FlowNodeKind::Input.has_exit());
        assert!(!FlowNodeKind::Input.has_entry());
        assert!(!FlowNodeKind::Output.has_exit());
        assert!(FlowNodeKind::Output.has_entry());
        assert!(FlowNodeKind::Default.has_exit() && FlowNodeKind::Default.has_entry());
    }

    #[test]
    fn test_node_kind_parse() {
        assert_eq!("output".parse::<FlowNodeKind>().unwrap(), FlowNodeKind::Output);
        assert!("decision".parse::<FlowNodeKind>().is_err());
    }
}
