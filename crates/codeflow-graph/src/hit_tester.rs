use crate::edge_router::{CubicBezier, EdgeRoute};
use crate::geometry::{Rect, Vec2};
use crate::graph::{EdgeIndex, GraphModel, NodeIndex};

/// Result of a hit test at a given graph-space position.
///
/// Priority order: Node > Edge > None
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    None,
    Node(NodeIndex),
    Edge(EdgeIndex),
}

#[derive(Debug, Clone)]
pub struct HitTester {
    node_rects: Vec<(NodeIndex, Rect)>,
    edge_curves: Vec<(EdgeIndex, CubicBezier)>,
    /// Tolerance in graph units for edge hits.
    edge_tolerance: f32,
    bezier_samples: usize,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTester {
    pub fn new() -> Self {
        Self {
            node_rects: Vec::new(),
            edge_curves: Vec::new(),
            edge_tolerance: 8.0,
            bezier_samples: 48,
        }
    }

    /// Refresh hit regions. Call after any position change.
    pub fn update(&mut self, model: &GraphModel, routes: &[EdgeRoute]) {
        self.node_rects.clear();
        self.edge_curves.clear();
        self.node_rects
            .extend(model.nodes().map(|(idx, node)| (idx, node.rect())));
        self.edge_curves
            .extend(routes.iter().map(|route| (route.edge, route.curve)));
    }

    pub fn hit_test(&self, point: Vec2) -> HitResult {
        // Later nodes are painted on top, so they win overlapping hits.
        if let Some((idx, _)) = self
            .node_rects
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(point))
        {
            return HitResult::Node(*idx);
        }

        self.edge_curves
            .iter()
            .map(|(idx, curve)| (*idx, curve.point_distance(point, self.bezier_samples)))
            .filter(|(_, distance)| *distance <= self.edge_tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| HitResult::Edge(idx))
            .unwrap_or(HitResult::None)
    }
}
