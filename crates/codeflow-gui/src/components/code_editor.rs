use crate::theme::Theme;
use eframe::egui;
use egui_code_editor::{CodeEditor, ColorTheme, Syntax};

pub const SAMPLE_CODE: &str = "function fibonacci(n) {\n  if (n <= 1) return n;\n  return fibonacci(n-1) + fibonacci(n-2);\n}\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Analyze,
    ForgetKey,
}

/// The snippet input view.
#[derive(Default)]
pub struct EditorPanel {
    pub code: String,
}

impl EditorPanel {
    pub fn can_analyze(&self, busy: bool) -> bool {
        !busy && !self.code.trim().is_empty()
    }

    pub fn load_sample(&mut self) {
        self.code = SAMPLE_CODE.to_string();
    }

    /// True when the buffer no longer matches the code behind the shown result.
    pub fn edited_since(&self, analyzed: Option<&str>) -> bool {
        analyzed.is_some_and(|analyzed| analyzed != self.code)
    }

    /// Editable view of the buffer beside the results; "Analyze again" submits it.
    pub fn show_compact(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let rows = self.code.lines().count().clamp(6, 30);
        CodeEditor::default()
            .id_source("results_code_editor")
            .with_rows(rows)
            .with_fontsize(theme.font_size_code)
            .with_theme(editor_theme(theme))
            .with_syntax(Syntax::rust())
            .with_numlines(true)
            .vscroll(false)
            .show(ui, &mut self.code);
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        busy: bool,
        has_credential: bool,
    ) -> Option<EditorAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Paste code to analyze");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if has_credential
                    && ui
                        .small_button("Forget API key")
                        .on_hover_text("Remove the stored Gemini API key")
                        .clicked()
                {
                    action = Some(EditorAction::ForgetKey);
                }
                if ui.button("Try sample").clicked() {
                    self.load_sample();
                }
                if ui.button("Clear").clicked() {
                    self.code.clear();
                }
            });
        });
        ui.add_space(8.0);

        let editor_height = (ui.available_height() - 56.0).max(120.0);
        let row_height = theme.font_size_code * 1.4;
        let rows = (editor_height / row_height).floor().max(6.0) as usize;

        egui::ScrollArea::vertical()
            .id_salt("editor_scroll")
            .max_height(editor_height)
            .show(ui, |ui| {
                CodeEditor::default()
                    .id_source("code_editor")
                    .with_rows(rows)
                    .with_fontsize(theme.font_size_code)
                    .with_theme(editor_theme(theme))
                    .with_syntax(Syntax::rust())
                    .with_numlines(true)
                    .vscroll(false)
                    .show(ui, &mut self.code);
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let enabled = self.can_analyze(busy);
            let analyze = ui.add_enabled(
                enabled,
                egui::Button::new("Analyze code").min_size(egui::vec2(140.0, 32.0)),
            );
            let shortcut = ui.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter));
            if enabled && (analyze.clicked() || shortcut) {
                action = Some(EditorAction::Analyze);
            }
            ui.label(
                egui::RichText::new(format!("{} lines", self.code.lines().count()))
                    .color(theme.muted_text()),
            );
        });

        action
    }
}

fn editor_theme(theme: &Theme) -> ColorTheme {
    if theme.dark {
        ColorTheme::GRUVBOX
    } else {
        ColorTheme::GITHUB_LIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_fibonacci() {
        let mut panel = EditorPanel::default();
        assert!(!panel.can_analyze(false));
        panel.load_sample();
        assert!(panel.code.starts_with("function fibonacci(n)"));
        assert_eq!(panel.code.lines().count(), 4);
        assert!(panel.can_analyze(false));
        assert!(!panel.can_analyze(true));
    }

    #[test]
    fn test_edits_after_analysis_are_detected() {
        let mut panel = EditorPanel::default();
        panel.load_sample();
        assert!(!panel.edited_since(None));
        assert!(!panel.edited_since(Some(SAMPLE_CODE)));
        panel.code.push_str("console.log(fibonacci(10));\n");
        assert!(panel.edited_since(Some(SAMPLE_CODE)));
    }

    #[test]
    fn test_whitespace_cannot_be_analyzed() {
        let panel = EditorPanel {
            code: "  \n\t".to_string(),
        };
        assert!(!panel.can_analyze(false));
    }
}
