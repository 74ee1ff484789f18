//! Headless canvas state for the inline and fullscreen flowchart views.
//!
//! Painting lives in the GUI crate; everything that decides what is drawn
//! where (layout, routing, pan/zoom, selection, dragging, minimap) lives here.

use crate::edge_router::{EdgeRoute, EdgeRouter};
use crate::geometry::{Rect, Vec2};
use crate::graph::{GraphError, GraphModel, GraphNode, NodeIndex};
use crate::hit_tester::{HitResult, HitTester};
use crate::minimap::Minimap;
use crate::projection::{LayoutProjector, ProjectedGraph};
use crate::viewport::Viewport;
use codeflow_core::Flowchart;
use std::sync::{Arc, LazyLock};

/// Share of the canvas kept free around a fitted graph.
pub const FIT_PADDING: f32 = 0.1;

static FALLBACK: LazyLock<Arc<Flowchart>> = LazyLock::new(|| Arc::new(Flowchart::fallback()));

/// The shared fallback graph. Always the same allocation, so views can tell it
/// apart from analysis results by identity.
pub fn fallback_graph() -> Arc<Flowchart> {
    Arc::clone(&*FALLBACK)
}

/// A laid-out graph with its routed edges and hit regions.
#[derive(Debug, Clone)]
pub struct CanvasScene {
    model: GraphModel,
    routes: Vec<EdgeRoute>,
    hit_tester: HitTester,
    router: EdgeRouter,
}

impl CanvasScene {
    pub fn build(flowchart: &Flowchart) -> Result<Self, GraphError> {
        let mut scene = Self {
            model: GraphModel::from_flowchart(flowchart)?,
            routes: Vec::new(),
            hit_tester: HitTester::new(),
            router: EdgeRouter::new(),
        };
        scene.reroute();
        Ok(scene)
    }

    fn empty() -> Self {
        Self {
            model: GraphModel::new(),
            routes: Vec::new(),
            hit_tester: HitTester::new(),
            router: EdgeRouter::new(),
        }
    }

    fn reroute(&mut self) {
        self.routes = self.router.route_all(&self.model);
        self.hit_tester.update(&self.model, &self.routes);
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn routes(&self) -> &[EdgeRoute] {
        &self.routes
    }

    pub fn hit_test(&self, graph_pos: Vec2) -> HitResult {
        self.hit_tester.hit_test(graph_pos)
    }

    fn move_node(&mut self, idx: NodeIndex, delta: Vec2) {
        self.model.translate_node(idx, delta);
        self.reroute();
    }
}

/// Inline results-view canvas: renders the supplied graph (or the fallback)
/// fitted to the available space. Pan and zoom only.
#[derive(Debug, Clone)]
pub struct InlineCanvas {
    source: Arc<Flowchart>,
    scene: CanvasScene,
    viewport: Viewport,
    needs_fit: bool,
}

impl Default for InlineCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineCanvas {
    pub fn new() -> Self {
        let source = fallback_graph();
        let scene = CanvasScene::build(&source).unwrap_or_else(|_| CanvasScene::empty());
        Self {
            source,
            scene,
            viewport: Viewport::default(),
            needs_fit: true,
        }
    }

    /// Shows `graph`, or the fallback graph when there is none. A no-op when
    /// the same graph is already shown.
    pub fn set_graph(&mut self, graph: Option<&Arc<Flowchart>>) -> Result<(), GraphError> {
        let next = graph.cloned().unwrap_or_else(fallback_graph);
        if Arc::ptr_eq(&next, &self.source) {
            return Ok(());
        }
        self.scene = CanvasScene::build(&next)?;
        self.source = next;
        self.needs_fit = true;
        Ok(())
    }

    pub fn is_fallback(&self) -> bool {
        Arc::ptr_eq(&self.source, &*FALLBACK)
    }

    /// The graph currently shown, for handing to the fullscreen view.
    pub fn source(&self) -> &Arc<Flowchart> {
        &self.source
    }

    pub fn scene(&self) -> &CanvasScene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Fits the graph on the first frame after it changed.
    pub fn prepare(&mut self, canvas: Rect) {
        if !self.needs_fit {
            return;
        }
        if let Some(bounds) = self.scene.model.bounds() {
            self.viewport.zoom_to_fit(bounds, canvas, FIT_PADDING);
        }
        self.needs_fit = false;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    pub fn zoom_at(&mut self, factor: f32, anchor: Vec2, canvas: Rect) {
        self.viewport.zoom_by(factor, anchor, canvas.center());
    }
}

/// Fullscreen canvas: a scaled projection of the upstream graph with its own
/// node copies, selection, dragging, pan/zoom and minimap.
#[derive(Debug, Clone)]
pub struct FullscreenCanvas {
    projection: ProjectedGraph,
    base: Option<Arc<Flowchart>>,
    scene: CanvasScene,
    viewport: Viewport,
    selection: Option<NodeIndex>,
    dragging: Option<NodeIndex>,
    show_minimap: bool,
    needs_fit: bool,
}

impl Default for FullscreenCanvas {
    fn default() -> Self {
        Self::new(LayoutProjector::default(), true)
    }
}

impl FullscreenCanvas {
    pub fn new(projector: LayoutProjector, show_minimap: bool) -> Self {
        Self {
            projection: ProjectedGraph::new(projector),
            base: None,
            scene: CanvasScene::empty(),
            viewport: Viewport::default(),
            selection: None,
            dragging: None,
            show_minimap,
            needs_fit: true,
        }
    }

    /// Re-seeds node copies from the projection whenever `base` is a different
    /// graph than the one last seen. Local edits (drags, selection) are
    /// discarded on re-seed. Returns whether a re-seed happened.
    pub fn sync(&mut self, base: &Arc<Flowchart>) -> Result<bool, GraphError> {
        if self
            .base
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, base))
        {
            return Ok(false);
        }
        let projected = self.projection.get(base);
        self.scene = CanvasScene::build(&projected)?;
        self.base = Some(Arc::clone(base));
        self.selection = None;
        self.dragging = None;
        self.needs_fit = true;
        tracing::debug!(
            nodes = self.scene.model.node_count(),
            edges = self.scene.model.edge_count(),
            "re-seeded fullscreen canvas"
        );
        Ok(true)
    }

    pub fn scene(&self) -> &CanvasScene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn node_position(&self, id: &str) -> Option<Vec2> {
        let idx = self.scene.model.find(id)?;
        Some(self.scene.model[idx].position)
    }

    pub fn selection(&self) -> Option<NodeIndex> {
        self.selection
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selection.and_then(|idx| self.scene.model.node(idx))
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn show_minimap(&self) -> bool {
        self.show_minimap
    }

    pub fn set_show_minimap(&mut self, show: bool) {
        self.show_minimap = show;
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.show_minimap = !self.show_minimap;
        self.show_minimap
    }

    /// Fits the graph on the first frame after a re-seed.
    pub fn prepare(&mut self, canvas: Rect) {
        if self.needs_fit {
            self.fit(canvas);
            self.needs_fit = false;
        }
    }

    pub fn fit(&mut self, canvas: Rect) {
        if let Some(bounds) = self.scene.model.bounds() {
            self.viewport.zoom_to_fit(bounds, canvas, FIT_PADDING);
        }
    }

    pub fn zoom_in(&mut self, canvas: Rect) {
        self.viewport.zoom_in(canvas.center());
    }

    pub fn zoom_out(&mut self, canvas: Rect) {
        self.viewport.zoom_out(canvas.center());
    }

    pub fn zoom_at(&mut self, factor: f32, anchor: Vec2, canvas: Rect) {
        self.viewport.zoom_by(factor, anchor, canvas.center());
    }

    pub fn hit_test(&self, screen_pos: Vec2, canvas: Rect) -> HitResult {
        let graph_pos = self.viewport.screen_to_graph(screen_pos, canvas.center());
        self.scene.hit_test(graph_pos)
    }

    /// Single selection: a node click selects it, anything else clears.
    pub fn click(&mut self, screen_pos: Vec2, canvas: Rect) -> HitResult {
        let hit = self.hit_test(screen_pos, canvas);
        self.selection = match hit {
            HitResult::Node(idx) => Some(idx),
            HitResult::Edge(_) | HitResult::None => None,
        };
        hit
    }

    /// Starts dragging the node under `screen_pos`. Returns `false` when the
    /// press is on empty space, in which case drags pan the view.
    pub fn begin_drag(&mut self, screen_pos: Vec2, canvas: Rect) -> bool {
        match self.hit_test(screen_pos, canvas) {
            HitResult::Node(idx) => {
                self.dragging = Some(idx);
                self.selection = Some(idx);
                true
            }
            _ => {
                self.dragging = None;
                false
            }
        }
    }

    /// Applies a screen-space drag: moves the dragged node copy, or pans.
    pub fn drag_by(&mut self, screen_delta: Vec2) {
        match self.dragging {
            Some(idx) => {
                let delta = screen_delta * (1.0 / self.viewport.zoom);
                self.scene.move_node(idx, delta);
            }
            None => self.viewport.pan_by(screen_delta),
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    pub fn minimap(&self, canvas: Rect) -> Option<Minimap> {
        if !self.show_minimap {
            return None;
        }
        Minimap::build(&self.scene.model, &self.viewport, canvas)
    }

    /// Recenters the view on the graph point under a minimap click.
    pub fn minimap_click(&mut self, screen_pos: Vec2, canvas: Rect) -> bool {
        let Some(target) = self
            .minimap(canvas)
            .and_then(|minimap| minimap.to_graph(screen_pos))
        else {
            return false;
        };
        self.viewport.center_on(target);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeflow_core::{FlowNodeKind, Position};

    fn canvas() -> Rect {
        Rect::from_pos_size(Vec2::ZERO, Vec2::new(1200.0, 800.0))
    }

    fn screen_center_of(fullscreen: &FullscreenCanvas, id: &str) -> Vec2 {
        let idx = fullscreen.scene().model().find(id).unwrap();
        let rect = fullscreen.scene().model()[idx].rect();
        fullscreen
            .viewport()
            .graph_to_screen(rect.center(), canvas().center())
    }

    #[test]
    fn test_inline_defaults_to_fallback() {
        let inline = InlineCanvas::new();
        assert!(inline.is_fallback());
        let model = inline.scene().model();
        assert_eq!(model.node_count(), 5);
        let inputs = model.nodes().filter(|(_, n)| n.kind == FlowNodeKind::Input).count();
        let outputs = model.nodes().filter(|(_, n)| n.kind == FlowNodeKind::Output).count();
        assert_eq!((inputs, outputs), (1, 2));
    }

    #[test]
    fn test_inline_switches_graphs_and_refits() {
        let mut inline = InlineCanvas::new();
        inline.prepare(canvas());
        let fitted = *inline.viewport();

        let mut chart = Flowchart::fallback();
        chart.nodes.truncate(1);
        chart.edges.clear();
        let result = Arc::new(chart);
        inline.set_graph(Some(&result)).unwrap();
        assert!(!inline.is_fallback());
        assert_eq!(inline.scene().model().node_count(), 1);

        inline.prepare(canvas());
        assert_ne!(*inline.viewport(), fitted);

        inline.set_graph(None).unwrap();
        assert!(inline.is_fallback());
    }

    #[test]
    fn test_inline_fit_keeps_graph_visible() {
        let mut inline = InlineCanvas::new();
        inline.prepare(canvas());
        let visible = inline.viewport().visible_graph_rect(canvas());
        let bounds = inline.scene().model().bounds().unwrap();
        assert!(visible.contains(bounds.min) && visible.contains(bounds.max));
    }

    #[test]
    fn test_fullscreen_uses_projected_positions() {
        let mut fullscreen = FullscreenCanvas::default();
        assert!(fullscreen.sync(&fallback_graph()).unwrap());
        assert_eq!(fullscreen.node_position("2"), Some(Vec2::new(500.0, 180.0)));
        assert!(fullscreen.show_minimap());
    }

    #[test]
    fn test_fullscreen_reseeds_on_new_identity() {
        let mut fullscreen = FullscreenCanvas::default();
        let first = Arc::new(Flowchart::fallback());
        fullscreen.sync(&first).unwrap();
        assert!(!fullscreen.sync(&first).unwrap());

        let mut moved = Flowchart::fallback();
        moved.nodes[1].position = Position::new(0.0, 50.0);
        let second = Arc::new(moved);
        assert!(fullscreen.sync(&second).unwrap());
        assert_eq!(fullscreen.node_position("2"), Some(Vec2::new(0.0, 90.0)));
    }

    #[test]
    fn test_selection_and_clear() {
        let mut fullscreen = FullscreenCanvas::default();
        fullscreen.sync(&fallback_graph()).unwrap();
        fullscreen.prepare(canvas());

        let pos = screen_center_of(&fullscreen, "4");
        assert!(matches!(fullscreen.click(pos, canvas()), HitResult::Node(_)));
        assert_eq!(fullscreen.selected_node().map(|n| n.id.as_str()), Some("4"));

        fullscreen.click(Vec2::new(1.0, 1.0), canvas());
        assert_eq!(fullscreen.selection(), None);
    }

    #[test]
    fn test_drag_moves_only_fullscreen_copy() {
        let base = fallback_graph();
        let mut fullscreen = FullscreenCanvas::default();
        fullscreen.sync(&base).unwrap();
        fullscreen.prepare(canvas());

        let before = fullscreen.node_position("3").unwrap();
        let pos = screen_center_of(&fullscreen, "3");
        assert!(fullscreen.begin_drag(pos, canvas()));
        let zoom = fullscreen.viewport().zoom;
        fullscreen.drag_by(Vec2::new(50.0 * zoom, 0.0));
        fullscreen.end_drag();

        let after = fullscreen.node_position("3").unwrap();
        assert!((after.x - before.x - 50.0).abs() < 1e-3);
        assert_eq!(base.node("3").unwrap().position, Position::new(100.0, 200.0));

        // The edge into the moved node follows it.
        let model = fullscreen.scene().model();
        let idx = model.find("3").unwrap();
        let route = fullscreen
            .scene()
            .routes()
            .iter()
            .find(|r| model[r.edge].target == idx)
            .unwrap();
        assert_eq!(route.curve.end, model[idx].rect().center_top());

        // Re-seeding from a new upstream graph discards the drag and selection.
        assert!(fullscreen.sync(&Arc::new(Flowchart::fallback())).unwrap());
        assert_eq!(fullscreen.node_position("3"), Some(before));
        assert_eq!(fullscreen.selection(), None);
    }

    #[test]
    fn test_drag_on_empty_space_pans() {
        let mut fullscreen = FullscreenCanvas::default();
        fullscreen.sync(&fallback_graph()).unwrap();
        fullscreen.prepare(canvas());
        let pan = fullscreen.viewport().pan;

        assert!(!fullscreen.begin_drag(Vec2::new(1.0, 1.0), canvas()));
        fullscreen.drag_by(Vec2::new(10.0, -5.0));
        assert_eq!(fullscreen.viewport().pan, pan + Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_minimap_toggle_and_recenter() {
        let mut fullscreen = FullscreenCanvas::default();
        fullscreen.sync(&fallback_graph()).unwrap();
        fullscreen.prepare(canvas());

        let minimap = fullscreen.minimap(canvas()).unwrap();
        let click = minimap.glyphs[0].rect.center();
        assert!(fullscreen.minimap_click(click, canvas()));
        let centered = fullscreen
            .viewport()
            .screen_to_graph(canvas().center(), canvas().center());
        let expected = minimap.to_graph(click).unwrap();
        assert!(centered.distance(expected) < 1e-2);

        assert!(!fullscreen.toggle_minimap());
        assert!(fullscreen.minimap(canvas()).is_none());
        assert!(!fullscreen.minimap_click(click, canvas()));
    }

    #[test]
    fn test_zoom_controls() {
        let mut fullscreen = FullscreenCanvas::default();
        fullscreen.sync(&fallback_graph()).unwrap();
        fullscreen.prepare(canvas());
        let fitted = fullscreen.viewport().zoom;

        fullscreen.zoom_in(canvas());
        assert!(fullscreen.viewport().zoom > fitted);
        fullscreen.zoom_out(canvas());
        fullscreen.zoom_out(canvas());
        assert!(fullscreen.viewport().zoom < fitted);
        fullscreen.fit(canvas());
        assert!((fullscreen.viewport().zoom - fitted).abs() < 1e-5);
    }
}
