use codeflow_core::{Flowchart, Position};
use std::sync::Arc;

/// Spreads a graph out for the fullscreen view by scaling node positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutProjector {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for LayoutProjector {
    fn default() -> Self {
        Self {
            scale_x: 2.0,
            scale_y: 1.8,
        }
    }
}

impl LayoutProjector {
    pub fn new(scale_x: f32, scale_y: f32) -> Self {
        Self { scale_x, scale_y }
    }

    /// Returns a new graph with every position scaled. Ids, kinds, labels and
    /// edges are copied unchanged; `base` is never touched.
    pub fn derive(&self, base: &Flowchart) -> Flowchart {
        let nodes = base
            .nodes
            .iter()
            .map(|node| {
                let mut projected = node.clone();
                projected.position = Position::new(
                    node.position.x * self.scale_x,
                    node.position.y * self.scale_y,
                );
                projected
            })
            .collect();
        Flowchart {
            nodes,
            edges: base.edges.clone(),
        }
    }
}

/// Memoised projection keyed on the identity of the base graph.
#[derive(Debug, Clone, Default)]
pub struct ProjectedGraph {
    projector: LayoutProjector,
    base: Option<Arc<Flowchart>>,
    projected: Option<Arc<Flowchart>>,
}

impl ProjectedGraph {
    pub fn new(projector: LayoutProjector) -> Self {
        Self {
            projector,
            base: None,
            projected: None,
        }
    }

    /// Projection of `base`, recomputed only when `base` is a different
    /// allocation than last time. Equal content behind a new `Arc` still
    /// produces a fresh projection.
    pub fn get(&mut self, base: &Arc<Flowchart>) -> Arc<Flowchart> {
        if let (Some(cached_base), Some(projected)) = (&self.base, &self.projected)
            && Arc::ptr_eq(cached_base, base)
        {
            return Arc::clone(projected);
        }
        let projected = Arc::new(self.projector.derive(base));
        tracing::debug!(nodes = projected.nodes.len(), "projected fullscreen layout");
        self.base = Some(Arc::clone(base));
        self.projected = Some(Arc::clone(&projected));
        projected
    }

    pub fn is_current(&self, base: &Arc<Flowchart>) -> bool {
        self.base
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, base))
    }
}
