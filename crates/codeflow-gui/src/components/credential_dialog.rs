use eframe::egui;

pub const API_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialAction {
    Save(String),
    Dismiss,
}

/// Modal prompt for the Gemini API key.
#[derive(Default)]
pub struct CredentialDialog {
    input: String,
    error: Option<String>,
}

/// The value to store, or `None` when the input is blank.
pub fn submitted_value(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CredentialDialog {
    pub fn reset(&mut self) {
        self.input.clear();
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<CredentialAction> {
        let mut action = None;

        egui::Window::new("Gemini API key")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label("An API key is needed to analyze code. It is stored locally on this machine.");
                ui.hyperlink_to("Get a key from Google AI Studio", API_KEY_URL);
                ui.add_space(8.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input)
                        .password(true)
                        .hint_text("Paste your API key")
                        .desired_width(f32::INFINITY),
                );
                response.request_focus();
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if let Some(error) = &self.error {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let value = submitted_value(&self.input);
                    let save = ui.add_enabled(value.is_some(), egui::Button::new("Save and analyze"));
                    if let Some(value) = value
                        && (save.clicked() || entered)
                    {
                        action = Some(CredentialAction::Save(value));
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(CredentialAction::Dismiss);
                    }
                });
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    action = Some(CredentialAction::Dismiss);
                }
            });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_value_trims() {
        assert_eq!(submitted_value("  AIza-key \n"), Some("AIza-key".to_string()));
        assert_eq!(submitted_value("   "), None);
        assert_eq!(submitted_value(""), None);
    }

    #[test]
    fn test_reset_clears_input_and_error() {
        let mut dialog = CredentialDialog::default();
        dialog.input = "secret".to_string();
        dialog.set_error("rejected");
        dialog.reset();
        assert!(dialog.input.is_empty());
        assert!(dialog.error.is_none());
    }
}
