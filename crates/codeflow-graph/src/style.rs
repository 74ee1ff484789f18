//! Flowchart Style System
//!
//! Maps node kinds, edges and explanation kinds to the colors and captions used
//! by both the inline and fullscreen renderers.

use codeflow_core::{ExplanationKind, FlowNodeKind, FlowchartNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

/// Visual class of a node card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVisual {
    Start,
    Process,
    Decision,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    RoundedRect,
    Diamond,
}

impl NodeVisual {
    pub fn classify(node: &FlowchartNode) -> Self {
        match node.kind {
            FlowNodeKind::Input => NodeVisual::Start,
            FlowNodeKind::Output => NodeVisual::End,
            FlowNodeKind::Default if node.is_decision() => NodeVisual::Decision,
            FlowNodeKind::Default => NodeVisual::Process,
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            NodeVisual::Start => "START",
            NodeVisual::Process => "PROCESS",
            NodeVisual::Decision => "DECISION",
            NodeVisual::End => "END",
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            NodeVisual::Decision => NodeShape::Diamond,
            _ => NodeShape::RoundedRect,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeColors {
    pub accent: Color,
    pub fill: Color,
    pub border: Color,
    pub selected_border: Color,
    pub text: Color,
}

const GREEN_500: Color = Color::rgb(0x22, 0xc5, 0x5e);
const GREEN_300: Color = Color::rgb(0x86, 0xef, 0xac);
const GREEN_400: Color = Color::rgb(0x4a, 0xde, 0x80);
const GREEN_50: Color = Color::rgb(0xf0, 0xfd, 0xf4);
const BLUE_500: Color = Color::rgb(0x3b, 0x82, 0xf6);
const BLUE_300: Color = Color::rgb(0x93, 0xc5, 0xfd);
const BLUE_400: Color = Color::rgb(0x60, 0xa5, 0xfa);
const BLUE_50: Color = Color::rgb(0xef, 0xf6, 0xff);
const AMBER_500: Color = Color::rgb(0xf5, 0x9e, 0x0b);
const AMBER_300: Color = Color::rgb(0xfc, 0xd3, 0x4d);
const AMBER_400: Color = Color::rgb(0xfb, 0xbf, 0x24);
const AMBER_50: Color = Color::rgb(0xff, 0xfb, 0xeb);
const PURPLE_500: Color = Color::rgb(0xa8, 0x55, 0xf7);
const PURPLE_300: Color = Color::rgb(0xd8, 0xb4, 0xfe);
const PURPLE_400: Color = Color::rgb(0xc0, 0x84, 0xfc);
const PURPLE_50: Color = Color::rgb(0xfa, 0xf5, 0xff);
const GRAY_800: Color = Color::rgb(0x1f, 0x29, 0x37);

pub fn get_node_colors(visual: NodeVisual) -> NodeColors {
    let (accent, fill, border, selected_border) = match visual {
        NodeVisual::Start => (GREEN_500, GREEN_50, GREEN_300, GREEN_400),
        NodeVisual::Process => (BLUE_500, BLUE_50, BLUE_300, BLUE_400),
        NodeVisual::Decision => (AMBER_500, AMBER_50, AMBER_300, AMBER_400),
        NodeVisual::End => (PURPLE_500, PURPLE_50, PURPLE_300, PURPLE_400),
    };
    NodeColors {
        accent,
        fill,
        border,
        selected_border,
        text: GRAY_800,
    }
}

/// Node fill on the minimap.
pub fn get_minimap_color(visual: NodeVisual) -> Color {
    match visual {
        NodeVisual::Start => Color::rgb(0x16, 0xa3, 0x4a),
        NodeVisual::End => Color::rgb(0xa8, 0x55, 0xf7),
        NodeVisual::Decision => Color::rgb(0xf5, 0x9e, 0x0b),
        NodeVisual::Process => Color::rgb(0x3b, 0x82, 0xf6),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
    pub label_background: Color,
    pub label_text: Color,
    pub label_padding: (f32, f32),
}

pub fn get_edge_style() -> EdgeStyle {
    let indigo = Color::rgb(0x63, 0x66, 0xf1);
    EdgeStyle {
        color: indigo,
        width: 2.0,
        label_background: Color::rgb(0xff, 0xff, 0xff),
        label_text: indigo,
        label_padding: (8.0, 4.0),
    }
}

/// Badge colors (fill, text) for an explanation kind.
pub fn get_kind_badge_colors(kind: ExplanationKind) -> (Color, Color) {
    let base = match kind {
        ExplanationKind::FunctionDeclaration | ExplanationKind::Return => BLUE_500,
        ExplanationKind::VariableDeclaration => GREEN_500,
        ExplanationKind::Loop => AMBER_500,
        ExplanationKind::Condition => Color::rgb(0xef, 0x44, 0x44),
        ExplanationKind::Operation => Color::rgb(0x63, 0x66, 0xf1),
        _ => Color::rgb(0x6b, 0x72, 0x80),
    };
    (base.with_alpha(26), base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeflow_core::Position;

    fn node(kind: FlowNodeKind, label: &str) -> FlowchartNode {
        FlowchartNode::new("x", kind, Position::default(), label)
    }

    #[test]
    fn test_classify() {
        assert_eq!(NodeVisual::classify(&node(FlowNodeKind::Input, "Start?")), NodeVisual::Start);
        assert_eq!(NodeVisual::classify(&node(FlowNodeKind::Output, "Return n")), NodeVisual::End);
        assert_eq!(
            NodeVisual::classify(&node(FlowNodeKind::Default, "n <= 1?")),
            NodeVisual::Decision
        );
        assert_eq!(
            NodeVisual::classify(&node(FlowNodeKind::Default, "Calculate sum")),
            NodeVisual::Process
        );
    }

    #[test]
    fn test_only_decisions_are_diamonds() {
        assert_eq!(NodeVisual::Decision.shape(), NodeShape::Diamond);
        for visual in [NodeVisual::Start, NodeVisual::Process, NodeVisual::End] {
            assert_eq!(visual.shape(), NodeShape::RoundedRect);
        }
    }

    #[test]
    fn test_minimap_palette() {
        assert_eq!(get_minimap_color(NodeVisual::Start), Color::rgb(0x16, 0xa3, 0x4a));
        assert_eq!(get_minimap_color(NodeVisual::Decision), Color::rgb(0xf5, 0x9e, 0x0b));
        assert_eq!(get_edge_style().color, Color::rgb(0x63, 0x66, 0xf1));
    }

    #[test]
    fn test_lighten_moves_toward_white() {
        let c = Color::rgb(0, 100, 200).lighten(1.0);
        assert_eq!(c, Color::rgb(255, 255, 255));
    }
}
