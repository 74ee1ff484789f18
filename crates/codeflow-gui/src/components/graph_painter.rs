//! Paints a laid-out flowchart scene.
//!
//! Layout, routing and hit testing come from `codeflow_graph`; this module only
//! maps graph space to screen space and emits egui shapes.

use crate::theme::{Theme, color32, egui_rect, from_pos2, pos2};
use codeflow_graph::{
    CanvasScene, EdgeRoute, EdgeStyle, GraphNode, HitResult, Minimap, NodeIndex, NodeShape,
    Vec2, Viewport, get_edge_style, get_node_colors,
};
use eframe::egui::{self, Color32, FontId, Stroke, StrokeKind};
use eframe::egui::epaint::CubicBezierShape;

/// Below this zoom node text is unreadable and skipped.
const TEXT_MIN_ZOOM: f32 = 0.25;

#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight {
    pub selected: Option<NodeIndex>,
    pub hovered: Option<HitResult>,
}

impl Highlight {
    fn node_hovered(&self, idx: NodeIndex) -> bool {
        self.hovered == Some(HitResult::Node(idx))
    }
}

pub fn paint_background(painter: &egui::Painter, rect: egui::Rect, theme: &Theme) {
    painter.rect_filled(rect, 0.0, theme.canvas_background());

    let spacing = 24.0;
    let dot = theme.flavor.surface1.gamma_multiply(0.6);
    let mut x = rect.left() + spacing / 2.0;
    while x < rect.right() {
        let mut y = rect.top() + spacing / 2.0;
        while y < rect.bottom() {
            painter.circle_filled(egui::pos2(x, y), 1.0, dot);
            y += spacing;
        }
        x += spacing;
    }
}

pub fn paint_scene(
    painter: &egui::Painter,
    scene: &CanvasScene,
    viewport: &Viewport,
    canvas: egui::Rect,
    highlight: Highlight,
) {
    let center = from_pos2(canvas.center());
    let style = get_edge_style();

    for route in scene.routes() {
        let hovered = highlight.hovered == Some(HitResult::Edge(route.edge));
        paint_edge(painter, route, viewport, center, &style, hovered);
    }

    for (idx, node) in scene.model().nodes() {
        let rect = egui_rect(viewport.graph_rect_to_screen(node.rect(), center));
        if !canvas.intersects(rect) {
            continue;
        }
        let selected = highlight.selected == Some(idx);
        paint_node(
            painter,
            node,
            rect,
            viewport.zoom,
            selected,
            highlight.node_hovered(idx),
        );
    }
}

fn paint_edge(
    painter: &egui::Painter,
    route: &EdgeRoute,
    viewport: &Viewport,
    center: Vec2,
    style: &EdgeStyle,
    hovered: bool,
) {
    let zoom = viewport.zoom;
    let curve = route.curve.map(|p| viewport.graph_to_screen(p, center));
    let color = color32(style.color);
    let width = (style.width * zoom).max(1.0) * if hovered { 1.75 } else { 1.0 };

    painter.add(CubicBezierShape::from_points_stroke(
        [
            pos2(curve.start),
            pos2(curve.control1),
            pos2(curve.control2),
            pos2(curve.end),
        ],
        false,
        Color32::TRANSPARENT,
        Stroke::new(width, color),
    ));

    // Arrowhead pointing down into the target's entry anchor.
    let tip = pos2(curve.end);
    let half = 5.0 * zoom.max(0.5);
    let depth = 9.0 * zoom.max(0.5);
    painter.add(egui::Shape::convex_polygon(
        vec![
            tip,
            egui::pos2(tip.x + half, tip.y - depth),
            egui::pos2(tip.x - half, tip.y - depth),
        ],
        color,
        Stroke::NONE,
    ));

    let Some(label) = &route.label else {
        return;
    };
    if zoom < TEXT_MIN_ZOOM {
        return;
    }
    let label_pos = pos2(viewport.graph_to_screen(route.label_pos, center));
    let galley = painter.layout_no_wrap(
        label.clone(),
        FontId::proportional(12.0 * zoom),
        color32(style.label_text),
    );
    let (pad_x, pad_y) = style.label_padding;
    let plate = egui::Rect::from_center_size(
        label_pos,
        galley.size() + egui::vec2(pad_x, pad_y) * 2.0 * zoom,
    );
    painter.rect_filled(plate, 4.0 * zoom, color32(style.label_background));
    painter.rect_stroke(
        plate,
        4.0 * zoom,
        Stroke::new(1.0, color.gamma_multiply(0.5)),
        StrokeKind::Middle,
    );
    let text_pos = plate.center() - galley.size() / 2.0;
    painter.galley(text_pos, galley, color32(style.label_text));
}

fn paint_node(
    painter: &egui::Painter,
    node: &GraphNode,
    rect: egui::Rect,
    zoom: f32,
    selected: bool,
    hovered: bool,
) {
    let colors = get_node_colors(node.visual);
    let fill = color32(colors.fill);
    let accent = color32(colors.accent);
    let border = if selected {
        Stroke::new(3.0, color32(colors.selected_border))
    } else if hovered {
        Stroke::new(2.0, accent)
    } else {
        Stroke::new(1.5, color32(colors.border))
    };

    let text_width = match node.visual.shape() {
        NodeShape::Diamond => {
            let c = rect.center();
            let points = vec![
                egui::pos2(c.x, rect.top()),
                egui::pos2(rect.right(), c.y),
                egui::pos2(c.x, rect.bottom()),
                egui::pos2(rect.left(), c.y),
            ];
            let shadow: Vec<egui::Pos2> = points
                .iter()
                .map(|p| *p + egui::vec2(0.0, 3.0 * zoom))
                .collect();
            painter.add(egui::Shape::convex_polygon(
                shadow,
                Color32::from_black_alpha(40),
                Stroke::NONE,
            ));
            painter.add(egui::Shape::convex_polygon(points, fill, border));
            rect.width() * 0.55
        }
        NodeShape::RoundedRect => {
            let radius = 8.0 * zoom;
            painter.rect_filled(
                rect.translate(egui::vec2(0.0, 3.0 * zoom)),
                radius,
                Color32::from_black_alpha(40),
            );
            painter.rect_filled(rect, radius, fill);
            let strip = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), 4.0 * zoom));
            painter.rect_filled(
                strip,
                egui::CornerRadius {
                    nw: radius as u8,
                    ne: radius as u8,
                    sw: 0,
                    se: 0,
                },
                accent,
            );
            painter.rect_stroke(rect, radius, border, StrokeKind::Middle);
            rect.width() - 24.0 * zoom
        }
    };

    if zoom < TEXT_MIN_ZOOM {
        return;
    }

    let caption = painter.layout_no_wrap(
        node.visual.caption().to_string(),
        FontId::proportional(10.0 * zoom),
        accent,
    );
    let label = painter.layout(
        node.label.clone(),
        FontId::proportional(13.0 * zoom),
        color32(colors.text),
        text_width.max(1.0),
    );
    let gap = 4.0 * zoom;
    let caption_height = caption.size().y;
    let block_height = caption_height + gap + label.size().y;
    let top = rect.center().y - block_height / 2.0 + 2.0 * zoom;

    let caption_pos = egui::pos2(rect.center().x - caption.size().x / 2.0, top);
    painter.galley(caption_pos, caption, accent);
    let label_pos = egui::pos2(
        rect.center().x - label.size().x / 2.0,
        top + caption_height + gap,
    );
    painter.galley(label_pos, label, color32(colors.text));
}

pub fn paint_minimap(painter: &egui::Painter, minimap: &Minimap, theme: &Theme) {
    let frame = egui_rect(minimap.frame);
    painter.rect_filled(frame, 5.0, theme.flavor.surface0.gamma_multiply(0.95));
    painter.rect_stroke(
        frame,
        5.0,
        Stroke::new(1.0, theme.flavor.overlay0),
        StrokeKind::Middle,
    );

    let clip = painter.with_clip_rect(frame);
    for glyph in &minimap.glyphs {
        clip.rect_filled(egui_rect(glyph.rect), 1.0, color32(glyph.color));
    }
    clip.rect_stroke(
        egui_rect(minimap.viewport_rect),
        0.0,
        Stroke::new(1.5, theme.flavor.blue),
        StrokeKind::Inside,
    );
}
