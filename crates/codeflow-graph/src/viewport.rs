use crate::geometry::{Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 4.0;
/// Multiplier applied by a single zoom-in / zoom-out control press.
pub const ZOOM_STEP: f32 = 1.2;

/// Pan/zoom state of one canvas.
///
/// A graph point `g` maps to `viewport.center() + pan + g * zoom` on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn graph_to_screen(&self, graph_pos: Vec2, viewport_center: Vec2) -> Vec2 {
        viewport_center + self.pan + graph_pos * self.zoom
    }

    pub fn screen_to_graph(&self, screen_pos: Vec2, viewport_center: Vec2) -> Vec2 {
        let offset = screen_pos - viewport_center - self.pan;
        Vec2::new(offset.x / self.zoom, offset.y / self.zoom)
    }

    pub fn graph_rect_to_screen(&self, rect: Rect, viewport_center: Vec2) -> Rect {
        Rect::from_min_max(
            self.graph_to_screen(rect.min, viewport_center),
            self.graph_to_screen(rect.max, viewport_center),
        )
    }

    /// The part of graph space currently visible in `viewport`.
    pub fn visible_graph_rect(&self, viewport: Rect) -> Rect {
        let center = viewport.center();
        Rect::from_min_max(
            self.screen_to_graph(viewport.min, center),
            self.screen_to_graph(viewport.max, center),
        )
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Multiplies the zoom by `factor`, keeping the graph point under `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Vec2, viewport_center: Vec2) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() <= f32::EPSILON {
            return;
        }
        let graph_pos = self.screen_to_graph(anchor, viewport_center);
        self.zoom = new_zoom;
        let new_screen = self.graph_to_screen(graph_pos, viewport_center);
        self.pan += anchor - new_screen;
    }

    pub fn zoom_in(&mut self, viewport_center: Vec2) {
        self.zoom_by(ZOOM_STEP, viewport_center, viewport_center);
    }

    pub fn zoom_out(&mut self, viewport_center: Vec2) {
        self.zoom_by(1.0 / ZOOM_STEP, viewport_center, viewport_center);
    }

    /// Fits `bounds` into `viewport`, leaving `padding` (a fraction of the
    /// viewport size) free on every side, and centers it.
    pub fn zoom_to_fit(&mut self, bounds: Rect, viewport: Rect, padding: f32) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        if viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            return;
        }
        let usable = (1.0 - 2.0 * padding).max(0.1);
        let scale = (viewport.width() * usable / bounds.width())
            .min(viewport.height() * usable / bounds.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = scale;
        self.center_on(bounds.center());
    }

    /// Pans so that `graph_pos` sits at the viewport center.
    pub fn center_on(&mut self, graph_pos: Vec2) {
        self.pan = -(graph_pos * self.zoom);
    }
}
