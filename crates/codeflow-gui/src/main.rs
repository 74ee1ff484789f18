#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;

mod app;
mod components;
mod theme;

use app::CodeflowApp;
use codeflow_app::AppConfig;

fn main() -> eframe::Result<()> {
    // Log to stdout (set `RUST_LOG=debug` for more).
    tracing_subscriber::fmt::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Codeflow"),
        ..Default::default()
    };

    eframe::run_native(
        "Codeflow",
        options,
        Box::new(move |cc| {
            let app = CodeflowApp::new(cc, config)?;
            Ok(Box::new(app))
        }),
    )
}
