use eframe::egui;
use egui_notify::{Anchor, Toast, Toasts};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    fn duration(self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(3),
            NotificationLevel::Success => Duration::from_secs(4),
            NotificationLevel::Warning => Duration::from_secs(5),
            NotificationLevel::Error => Duration::from_secs(8),
        }
    }
}

/// Toasts with a short deduplication window.
pub struct NotificationManager {
    toasts: Toasts,
    recent: Vec<(String, Instant)>,
    dedup_window: Duration,
}

impl NotificationManager {
    pub fn new() -> Self {
        let toasts = Toasts::new()
            .with_anchor(Anchor::TopRight)
            .with_margin(egui::vec2(8.0, 8.0));

        Self {
            toasts,
            recent: Vec::new(),
            dedup_window: Duration::from_secs(2),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        if self.is_duplicate(&message) {
            return;
        }
        self.recent.push((message.clone(), Instant::now()));

        let mut toast = match level {
            NotificationLevel::Info => Toast::info(message),
            NotificationLevel::Success => Toast::success(message),
            NotificationLevel::Warning => Toast::warning(message),
            NotificationLevel::Error => Toast::error(message),
        };
        toast.duration(Some(level.duration()));
        self.toasts.add(toast);
    }

    fn is_duplicate(&mut self, message: &str) -> bool {
        let now = Instant::now();
        let window = self.dedup_window;
        self.recent
            .retain(|(_, shown)| now.duration_since(*shown) < window);
        self.recent.iter().any(|(recent, _)| recent == message)
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Call once per frame.
    pub fn render(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
