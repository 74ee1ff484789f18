//! Catppuccin theme plus conversions from the headless graph types to egui.

use codeflow_graph::{Color, Rect, Vec2};
use eframe::egui::{self, Color32};

pub mod spacing {
    pub const PANEL_PADDING: f32 = 12.0;
    pub const ITEM_SPACING: f32 = 8.0;
    pub const SECTION_SPACING: f32 = 16.0;
    pub const BUTTON_PADDING: f32 = 8.0;
}

pub mod radius {
    use eframe::egui::CornerRadius;

    pub const MEDIUM: CornerRadius = CornerRadius::same(4);
    pub const LARGE: CornerRadius = CornerRadius::same(8);
    pub const PILL: CornerRadius = CornerRadius::same(255);
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub dark: bool,
    pub flavor: catppuccin_egui::Theme,
    pub font_size_code: f32,
}

impl Theme {
    pub fn new(dark: bool) -> Self {
        Self {
            dark,
            flavor: if dark {
                catppuccin_egui::MOCHA
            } else {
                catppuccin_egui::LATTE
            },
            font_size_code: 14.0,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        catppuccin_egui::set_theme(ctx, self.flavor);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(spacing::ITEM_SPACING, spacing::ITEM_SPACING);
        style.spacing.button_padding =
            egui::vec2(spacing::BUTTON_PADDING, spacing::BUTTON_PADDING / 2.0);
        style.spacing.window_margin = egui::Margin::same(spacing::PANEL_PADDING as i8);
        style.interaction.show_tooltips_only_when_still = false;
        ctx.set_style(style);
    }

    /// Background behind flowchart canvases.
    pub fn canvas_background(&self) -> Color32 {
        self.flavor.mantle
    }

    pub fn muted_text(&self) -> Color32 {
        self.flavor.subtext0
    }
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn pos2(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

pub fn to_vec2(v: egui::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

pub fn from_pos2(p: egui::Pos2) -> Vec2 {
    Vec2::new(p.x, p.y)
}

pub fn egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_max(pos2(rect.min), pos2(rect.max))
}

pub fn from_egui_rect(rect: egui::Rect) -> Rect {
    Rect::from_min_max(from_pos2(rect.min), from_pos2(rect.max))
}
