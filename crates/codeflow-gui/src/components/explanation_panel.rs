use crate::theme::{Theme, color32, radius};
use codeflow_graph::{ExplanationRow, ExplanationView};
use eframe::egui;

/// Summary plus one card per explanation. Renders nothing without a result.
pub fn show(ui: &mut egui::Ui, theme: &Theme, view: Option<&ExplanationView>) {
    let Some(view) = view else {
        return;
    };

    if view.has_summary() {
        ui.heading("Summary");
        ui.label(&view.summary);
        ui.add_space(12.0);
    }

    ui.heading("Line by line");
    if view.rows.is_empty() {
        ui.label(egui::RichText::new("No explanations returned.").color(theme.muted_text()));
        return;
    }
    for row in &view.rows {
        show_row(ui, theme, row);
    }
}

fn show_row(ui: &mut egui::Ui, theme: &Theme, row: &ExplanationRow) {
    egui::Frame::group(ui.style())
        .corner_radius(radius::LARGE)
        .fill(theme.flavor.surface0.gamma_multiply(0.5))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("Line {}", row.line_number))
                        .strong()
                        .color(theme.flavor.blue),
                );
                badge(ui, row);
            });
            ui.label(
                egui::RichText::new(&row.code)
                    .monospace()
                    .background_color(theme.flavor.crust),
            );
            ui.label(&row.explanation);
        });
    ui.add_space(6.0);
}

fn badge(ui: &mut egui::Ui, row: &ExplanationRow) {
    egui::Frame::new()
        .fill(color32(row.badge_fill))
        .corner_radius(radius::PILL)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(row.badge())
                    .small()
                    .color(color32(row.badge_text)),
            );
        });
}
