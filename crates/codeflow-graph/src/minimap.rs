use crate::geometry::{Rect, Vec2};
use crate::graph::GraphModel;
use crate::style::{Color, get_minimap_color};
use crate::viewport::Viewport;

pub const MINIMAP_SIZE: Vec2 = Vec2 { x: 150.0, y: 100.0 };
pub const MINIMAP_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MinimapGlyph {
    pub rect: Rect,
    pub color: Color,
}

/// Scaled overview of a graph placed in a screen-space frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    pub frame: Rect,
    scale: f32,
    offset: Vec2,
    pub glyphs: Vec<MinimapGlyph>,
    /// The visible part of the canvas, in minimap coordinates.
    pub viewport_rect: Rect,
}

impl Minimap {
    /// Frame anchored to the bottom-right corner of `canvas`.
    pub fn frame_for(canvas: Rect) -> Rect {
        let min = canvas.max - MINIMAP_SIZE - Vec2::new(MINIMAP_MARGIN, MINIMAP_MARGIN);
        Rect::from_pos_size(min, MINIMAP_SIZE)
    }

    /// Returns `None` for an empty graph.
    pub fn build(model: &GraphModel, viewport: &Viewport, canvas: Rect) -> Option<Self> {
        let visible = viewport.visible_graph_rect(canvas);
        let bounds = model.bounds()?.union(&visible);
        let frame = Self::frame_for(canvas);

        let scale = (MINIMAP_SIZE.x / bounds.width().max(1.0))
            .min(MINIMAP_SIZE.y / bounds.height().max(1.0))
            .min(1.0);
        let offset = frame.center() - bounds.center() * scale;

        let mut minimap = Self {
            frame,
            scale,
            offset,
            glyphs: Vec::with_capacity(model.node_count()),
            viewport_rect: Rect::NOTHING,
        };
        minimap.glyphs = model
            .nodes()
            .map(|(_, node)| MinimapGlyph {
                rect: minimap.to_minimap_rect(node.rect()),
                color: get_minimap_color(node.visual),
            })
            .collect();
        minimap.viewport_rect = minimap.to_minimap_rect(visible);
        Some(minimap)
    }

    pub fn to_minimap(&self, graph_pos: Vec2) -> Vec2 {
        graph_pos * self.scale + self.offset
    }

    pub fn to_minimap_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_minimap(rect.min), self.to_minimap(rect.max))
    }

    /// Graph point under a click on the minimap, or `None` outside the frame.
    pub fn to_graph(&self, minimap_pos: Vec2) -> Option<Vec2> {
        if !self.frame.contains(minimap_pos) {
            return None;
        }
        let local = minimap_pos - self.offset;
        Some(Vec2::new(local.x / self.scale, local.y / self.scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeflow_core::Flowchart;

    fn canvas() -> Rect {
        Rect::from_pos_size(Vec2::ZERO, Vec2::new(1200.0, 800.0))
    }

    fn fitted() -> (GraphModel, Viewport) {
        let model = GraphModel::from_flowchart(&Flowchart::fallback()).unwrap();
        let mut viewport = Viewport::default();
        viewport.zoom_to_fit(model.bounds().unwrap(), canvas(), 0.1);
        (model, viewport)
    }

    #[test]
    fn test_frame_in_bottom_right_corner() {
        let frame = Minimap::frame_for(canvas());
        assert_eq!(frame.max, Vec2::new(1190.0, 790.0));
        assert_eq!(frame.size(), MINIMAP_SIZE);
    }

    #[test]
    fn test_glyphs_fit_inside_frame() {
        let (model, viewport) = fitted();
        let minimap = Minimap::build(&model, &viewport, canvas()).unwrap();
        assert_eq!(minimap.glyphs.len(), 5);
        assert!(minimap.scale <= 1.0);
        let frame = minimap.frame.expand(0.5);
        for glyph in &minimap.glyphs {
            assert!(frame.contains(glyph.rect.min) && frame.contains(glyph.rect.max));
        }
        assert!(frame.contains(minimap.viewport_rect.min));
        assert!(frame.contains(minimap.viewport_rect.max));
    }

    #[test]
    fn test_click_maps_back_to_graph() {
        let (model, viewport) = fitted();
        let minimap = Minimap::build(&model, &viewport, canvas()).unwrap();
        let target = model[model.find("4").unwrap()].rect().center();
        let clicked = minimap.to_graph(minimap.to_minimap(target)).unwrap();
        assert!(clicked.distance(target) < 0.1);
        assert_eq!(minimap.to_graph(Vec2::new(-1.0, -1.0)), None);
    }

    #[test]
    fn test_empty_graph_has_no_minimap() {
        assert!(Minimap::build(&GraphModel::new(), &Viewport::default(), canvas()).is_none());
    }
}
