use crate::geometry::{Rect, Vec2};
use crate::style::NodeVisual;
use codeflow_core::{FlowNodeKind, Flowchart};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use thiserror::Error;

pub const MIN_NODE_WIDTH: f32 = 180.0;
pub const MAX_NODE_WIDTH: f32 = 280.0;
const CHAR_WIDTH: f32 = 7.5;
const HORIZONTAL_PADDING: f32 = 32.0;
const CAPTION_HEIGHT: f32 = 36.0;
const LINE_HEIGHT: f32 = 18.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),
    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge { edge: String, node: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: FlowNodeKind,
    pub label: String,
    pub visual: NodeVisual,
    /// Top-left corner in graph space.
    pub position: Vec2,
    pub size: Vec2,
}

impl GraphNode {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub label: Option<String>,
    pub source: NodeIndex,
    pub target: NodeIndex,
}

/// Estimated card size for a label. Cards grow with the label between the
/// minimum and maximum width, then wrap.
pub fn estimate_node_size(label: &str, visual: NodeVisual) -> Vec2 {
    let text_width = label.chars().count() as f32 * CHAR_WIDTH;
    let width = (text_width + HORIZONTAL_PADDING).clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH);
    let line_width = width - HORIZONTAL_PADDING;
    let lines = (text_width / line_width).ceil().max(1.0);
    let height = CAPTION_HEIGHT + lines * LINE_HEIGHT;
    match visual {
        // A diamond needs more room to fit the same text.
        NodeVisual::Decision => Vec2::new(width + 40.0, height * 1.6),
        _ => Vec2::new(width, height),
    }
}

/// Index-based view of a flowchart used for layout, routing and hit testing.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_map: HashMap<String, NodeIndex>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flowchart(flowchart: &Flowchart) -> Result<Self, GraphError> {
        let mut model = Self::new();
        for node in &flowchart.nodes {
            let visual = NodeVisual::classify(node);
            model.add_node(GraphNode {
                id: node.id.clone(),
                kind: node.kind,
                label: node.label.clone(),
                visual,
                position: node.position.into(),
                size: estimate_node_size(&node.label, visual),
            })?;
        }
        for edge in &flowchart.edges {
            let source = model.require(&edge.id, &edge.source)?;
            let target = model.require(&edge.id, &edge.target)?;
            let (from, to) = (model.nodes[source.0].kind, model.nodes[target.0].kind);
            if !from.has_exit() || !to.has_entry() {
                tracing::warn!(
                    edge = %edge.id,
                    source = %from,
                    target = %to,
                    "skipping edge between nodes without matching anchors"
                );
                continue;
            }
            model.edges.push(GraphEdge {
                id: edge.id.clone(),
                label: edge.label.clone(),
                source,
                target,
            });
        }
        Ok(model)
    }

    fn require(&self, edge: &str, node: &str) -> Result<NodeIndex, GraphError> {
        self.find(node).ok_or_else(|| GraphError::DanglingEdge {
            edge: edge.to_string(),
            node: node.to_string(),
        })
    }

    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeIndex, GraphError> {
        if self.node_map.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(node);
        Ok(idx)
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &GraphEdge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeIndex(i), e))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(idx.0)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&GraphEdge> {
        self.edges.get(idx.0)
    }

    pub fn translate_node(&mut self, idx: NodeIndex, delta: Vec2) {
        if let Some(node) = self.nodes.get_mut(idx.0) {
            node.position += delta;
        }
    }

    /// Bounding box of every node card, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.nodes.iter().map(GraphNode::rect))
    }
}

impl Index<NodeIndex> for GraphModel {
    type Output = GraphNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for GraphModel {
    type Output = GraphEdge;

    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeflow_core::{FlowchartEdge, FlowchartNode, Position};

    #[test]
    fn test_from_fallback() {
        let model = GraphModel::from_flowchart(&Flowchart::fallback()).unwrap();
        assert_eq!(model.node_count(), 5);
        assert_eq!(model.edge_count(), 4);

        let decision = model.find("2").unwrap();
        assert_eq!(model[decision].visual, NodeVisual::Decision);
        assert_eq!(model[decision].position, Vec2::new(250.0, 100.0));

        let (_, yes) = model.edges().find(|(_, e)| e.id == "e2-3").unwrap();
        assert_eq!(yes.source, decision);
        assert_eq!(yes.target, model.find("3").unwrap());
        assert_eq!(yes.label.as_deref(), Some("Yes"));
    }

    #[test]
    fn test_rejects_duplicates_and_dangling_edges() {
        let mut chart = Flowchart::fallback();
        chart.nodes.push(FlowchartNode::new(
            "1",
            FlowNodeKind::Default,
            Position::default(),
            "again",
        ));
        assert_eq!(
            GraphModel::from_flowchart(&chart).unwrap_err(),
            GraphError::DuplicateNodeId("1".to_string())
        );

        let mut chart = Flowchart::fallback();
        chart.edges.push(FlowchartEdge::new("bad", "1", "42"));
        assert!(matches!(
            GraphModel::from_flowchart(&chart),
            Err(GraphError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn test_edges_without_anchors_are_skipped() {
        let mut chart = Flowchart::fallback();
        chart.edges.push(FlowchartEdge::new("e5-1", "5", "1"));
        chart.edges.push(FlowchartEdge::new("e3-4", "3", "4"));
        chart.edges.push(FlowchartEdge::new("e4-1", "4", "1"));
        let model = GraphModel::from_flowchart(&chart).unwrap();
        assert_eq!(model.edge_count(), 4);
        for (_, edge) in model.edges() {
            assert!(model[edge.source].kind.has_exit());
            assert!(model[edge.target].kind.has_entry());
        }
    }

    #[test]
    fn test_node_size_bounds() {
        let short = estimate_node_size("Go", NodeVisual::Process);
        assert_eq!(short.x, MIN_NODE_WIDTH);

        let long = estimate_node_size(&"x".repeat(200), NodeVisual::Process);
        assert_eq!(long.x, MAX_NODE_WIDTH);
        assert!(long.y > short.y);

        let diamond = estimate_node_size("Go", NodeVisual::Decision);
        assert!(diamond.x > short.x && diamond.y > short.y);
    }

    #[test]
    fn test_bounds_and_translate() {
        let mut model = GraphModel::from_flowchart(&Flowchart::fallback()).unwrap();
        let before = model.bounds().unwrap();
        assert_eq!(before.min, Vec2::new(100.0, 0.0));

        let start = model.find("1").unwrap();
        model.translate_node(start, Vec2::new(-200.0, 0.0));
        assert_eq!(model[start].position, Vec2::new(50.0, 0.0));
        assert_eq!(model.bounds().unwrap().min.x, 50.0);

        assert_eq!(GraphModel::new().bounds(), None);
    }
}
