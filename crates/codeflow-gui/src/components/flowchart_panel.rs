use crate::components::graph_painter::{self, Highlight};
use crate::theme::{Theme, from_egui_rect, from_pos2, to_vec2};
use codeflow_core::Flowchart;
use codeflow_graph::InlineCanvas;
use eframe::egui;
use std::sync::Arc;

/// Exponential zoom per scrolled point.
const SCROLL_ZOOM_RATE: f32 = 0.0015;

/// Inline flowchart: renders the result graph or the fallback, pan and zoom only.
pub struct FlowchartPanel {
    canvas: InlineCanvas,
}

impl Default for FlowchartPanel {
    fn default() -> Self {
        Self {
            canvas: InlineCanvas::new(),
        }
    }
}

impl FlowchartPanel {
    pub fn set_graph(&mut self, graph: Option<&Arc<Flowchart>>) {
        if let Err(e) = self.canvas.set_graph(graph) {
            tracing::warn!("Flowchart could not be laid out, showing fallback: {}", e);
            let _ = self.canvas.set_graph(None);
        }
    }

    /// Returns true when the user asked for the fullscreen view.
    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) -> bool {
        let mut expand = false;

        ui.horizontal(|ui| {
            ui.heading("Flowchart");
            if self.canvas.is_fallback() {
                ui.label(egui::RichText::new("sample").italics().color(theme.muted_text()));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button("Expand")
                    .on_hover_text("Open the flowchart fullscreen")
                    .clicked()
                {
                    expand = true;
                }
            });
        });

        let size = egui::vec2(ui.available_width(), ui.available_height().max(240.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let canvas = from_egui_rect(rect);
        self.canvas.prepare(canvas);

        if response.dragged() {
            self.canvas.pan_by(to_vec2(response.drag_delta()));
        }
        if let Some(pointer) = response.hover_pos() {
            let factor = ui.input(|i| {
                i.zoom_delta() * (i.smooth_scroll_delta.y * SCROLL_ZOOM_RATE).exp()
            });
            if (factor - 1.0).abs() > f32::EPSILON {
                self.canvas.zoom_at(factor, from_pos2(pointer), canvas);
            }
        }
        if response.double_clicked() {
            expand = true;
        }

        let painter = ui.painter_at(rect);
        graph_painter::paint_background(&painter, rect, theme);
        graph_painter::paint_scene(
            &painter,
            self.canvas.scene(),
            self.canvas.viewport(),
            rect,
            Highlight::default(),
        );
        if self.canvas.scene().model().is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "The analysis produced an empty flowchart",
                egui::FontId::proportional(14.0),
                theme.muted_text(),
            );
        }

        expand
    }
}
