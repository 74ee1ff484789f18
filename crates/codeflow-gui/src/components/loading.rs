use crate::theme::Theme;
use eframe::egui;
use std::time::Duration;

const MESSAGES: [&str; 5] = [
    "Analyzing code structure...",
    "Identifying key components...",
    "Generating flowchart...",
    "Creating explanations...",
    "Preparing results...",
];

const MESSAGE_INTERVAL: Duration = Duration::from_secs(2);

/// Status line for the given time since the analysis started.
pub fn message_for(elapsed: Duration) -> &'static str {
    let step = (elapsed.as_millis() / MESSAGE_INTERVAL.as_millis()) as usize;
    MESSAGES[step % MESSAGES.len()]
}

/// Shown while an analysis is in flight. Returns true when the user cancels.
pub fn show(ui: &mut egui::Ui, theme: &Theme, elapsed: Duration) -> bool {
    let mut cancel = false;
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() * 0.3).max(24.0));
        ui.add(egui::Spinner::new().size(48.0));
        ui.add_space(16.0);
        ui.heading(message_for(elapsed));
        ui.label(
            egui::RichText::new(format!("{}s elapsed", elapsed.as_secs()))
                .color(theme.muted_text()),
        );
        ui.add_space(16.0);
        if ui.button("Cancel").clicked() {
            cancel = true;
        }
    });
    cancel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_cycle() {
        assert_eq!(message_for(Duration::ZERO), "Analyzing code structure...");
        assert_eq!(message_for(Duration::from_millis(2100)), "Identifying key components...");
        assert_eq!(message_for(Duration::from_secs(8)), "Preparing results...");
        assert_eq!(message_for(Duration::from_secs(10)), "Analyzing code structure...");
    }
}
