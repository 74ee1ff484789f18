use crate::components::{
    code_editor::{EditorAction, EditorPanel},
    credential_dialog::{CredentialAction, CredentialDialog},
    explanation_panel,
    flowchart_modal::{FlowchartModal, ViewCommand},
    flowchart_panel::FlowchartPanel,
    loading,
    notifications::NotificationManager,
};
use crate::theme::Theme;
use codeflow_app::{AnalysisState, AppConfig, Orchestrator, OrchestratorError, SubmitOutcome};
use codeflow_core::AnalysisResult;
use codeflow_events::{Event, EventBus, EventListener};
use codeflow_graph::{ExplanationView, fallback_graph};
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

pub struct CodeflowApp {
    config: AppConfig,
    theme: Theme,
    needs_theme_apply: bool,
    event_bus: EventBus,
    orchestrator: Orchestrator,
    notifications: NotificationManager,

    editor: EditorPanel,
    credential_dialog: CredentialDialog,
    flowchart: FlowchartPanel,
    modal: FlowchartModal,

    /// Result currently rendered; compared by identity to detect a new cycle.
    shown_result: Option<Arc<AnalysisResult>>,
    explanations: Option<ExplanationView>,
}

impl CodeflowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let event_bus = EventBus::new();
        let orchestrator = codeflow_app::build_orchestrator(&config, event_bus.clone())?;
        tracing::info!(model = %config.model, "codeflow started");

        Ok(Self {
            theme: Theme::new(config.dark_mode),
            needs_theme_apply: true,
            modal: FlowchartModal::new(&config.graph),
            config,
            event_bus,
            orchestrator,
            notifications: NotificationManager::new(),
            editor: EditorPanel::default(),
            credential_dialog: CredentialDialog::default(),
            flowchart: FlowchartPanel::default(),
            shown_result: None,
            explanations: None,
        })
    }

    /// Points the renderers at the orchestrator's current result.
    fn sync_result(&mut self) {
        let result = self.orchestrator.result();
        let same = match (&result, &self.shown_result) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.explanations = ExplanationView::from_result(result.as_deref());
            let graph = result.as_ref().map(|r| r.graph());
            self.flowchart.set_graph(graph.as_ref());
            self.shown_result = result;
        }

        let fullscreen_base = self
            .shown_result
            .as_ref()
            .map(|r| r.graph())
            .unwrap_or_else(fallback_graph);
        self.modal.sync(&fullscreen_base);
    }

    fn set_dark_mode(&mut self, ctx: &egui::Context, dark: bool) {
        self.config.dark_mode = dark;
        self.theme = Theme::new(dark);
        self.theme.apply(ctx);
        self.config.save();
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if !self.modal.is_open() {
            return;
        }
        let (zoom_in, zoom_out, fit, close) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                i.key_pressed(egui::Key::Minus),
                i.key_pressed(egui::Key::Num0),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if zoom_in {
            self.event_bus.publish(Event::ZoomIn);
        }
        if zoom_out {
            self.event_bus.publish(Event::ZoomOut);
        }
        if fit {
            self.event_bus.publish(Event::ZoomToFit);
        }
        if close {
            self.event_bus.publish(Event::CloseFullscreen);
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Codeflow");
                ui.label(
                    egui::RichText::new("Explain code and see its control flow")
                        .color(self.theme.muted_text()),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if self.theme.dark { "Light mode" } else { "Dark mode" };
                    if ui.button(label).clicked() {
                        let dark = !self.theme.dark;
                        self.set_dark_mode(ui.ctx(), dark);
                    }
                });
            });
        });
    }

    fn editor_ui(&mut self, ui: &mut egui::Ui) {
        let busy = self.orchestrator.is_busy();
        let has_credential = self.orchestrator.has_credential();
        match self.editor.show(ui, &self.theme, busy, has_credential) {
            Some(EditorAction::Analyze) => {
                if self.orchestrator.submit(&self.editor.code) == SubmitOutcome::Rejected {
                    self.notifications
                        .warning("An analysis is already running");
                }
            }
            Some(EditorAction::ForgetKey) => {
                if let Err(e) = self.orchestrator.forget_credential() {
                    tracing::error!("Failed to remove credential: {}", e);
                    self.notifications.error("Could not remove the API key");
                }
            }
            None => {}
        }
    }

    fn results_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Back to editor").clicked() {
                self.orchestrator.back_to_editor();
            }
            let analyze = ui
                .add_enabled(
                    self.editor.can_analyze(self.orchestrator.is_busy()),
                    egui::Button::new("Analyze again"),
                )
                .on_hover_text("Analyze the code shown below");
            if analyze.clicked()
                && self.orchestrator.submit(&self.editor.code) == SubmitOutcome::Rejected
            {
                self.notifications.warning("An analysis is already running");
            }
        });

        if let Some(error) = self.orchestrator.error() {
            egui::Frame::new()
                .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
                .corner_radius(crate::theme::radius::MEDIUM)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.colored_label(ui.visuals().error_fg_color, error.user_message());
                });
        }
        ui.add_space(crate::theme::spacing::ITEM_SPACING);

        let edited = self.editor.edited_since(self.orchestrator.analyzed_code());
        let mut expand = false;
        ui.columns(2, |columns| {
            egui::ScrollArea::vertical()
                .id_salt("results_scroll")
                .show(&mut columns[0], |ui| {
                    ui.horizontal(|ui| {
                        ui.heading("Your code");
                        if edited {
                            ui.label(
                                egui::RichText::new("edited since the last analysis")
                                    .italics()
                                    .color(self.theme.muted_text()),
                            );
                        }
                    });
                    self.editor.show_compact(ui, &self.theme);
                    ui.add_space(crate::theme::spacing::SECTION_SPACING);
                    explanation_panel::show(ui, &self.theme, self.explanations.as_ref());
                });
            expand = self.flowchart.show(&mut columns[1], &self.theme);
        });
        if expand {
            self.event_bus.publish(Event::OpenFullscreen);
        }
    }

    fn credential_ui(&mut self, ctx: &egui::Context) {
        match self.credential_dialog.show(ctx) {
            Some(CredentialAction::Save(value)) => {
                match self.orchestrator.provide_credential(&value) {
                    Ok(_) => self.credential_dialog.reset(),
                    Err(OrchestratorError::Busy) => {
                        self.notifications.warning("Wait for the running analysis to finish");
                    }
                    Err(OrchestratorError::Credential(e)) => {
                        tracing::error!("Failed to store credential: {}", e);
                        self.credential_dialog.set_error(e.to_string());
                    }
                }
            }
            Some(CredentialAction::Dismiss) => {
                self.credential_dialog.reset();
                self.orchestrator.dismiss_credential_prompt();
            }
            None => {}
        }
    }
}

impl EventListener for CodeflowApp {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::CredentialRequired { .. } => self.credential_dialog.reset(),
            Event::CredentialSaved => self.notifications.success("API key saved"),
            Event::AnalysisSucceeded { node_count, .. } => {
                self.notifications
                    .success(format!("Analysis complete ({node_count} flowchart nodes)"));
            }
            Event::ShowInfo { message } => self.notifications.info(message.clone()),
            Event::ShowError { message } => self.notifications.error(message.clone()),
            Event::OpenFullscreen => self.modal.open(),
            Event::CloseFullscreen => self.modal.close(),
            Event::ZoomIn => self.modal.queue(ViewCommand::ZoomIn),
            Event::ZoomOut => self.modal.queue(ViewCommand::ZoomOut),
            Event::ZoomToFit => self.modal.queue(ViewCommand::Fit),
            Event::SetShowMinimap(show) => {
                self.modal.set_show_minimap(*show);
                self.config.graph.show_minimap = *show;
                self.config.save();
            }
            _ => {}
        }
    }
}

impl eframe::App for CodeflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.needs_theme_apply {
            self.theme.apply(ctx);
            self.needs_theme_apply = false;
        }

        self.orchestrator.poll();
        self.sync_result();

        self.handle_shortcuts(ctx);
        let bus = self.event_bus.clone();
        bus.dispatch_to(self);

        self.top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.orchestrator.state() {
                AnalysisState::InFlight => {
                    let elapsed = self.orchestrator.elapsed().unwrap_or_default();
                    if loading::show(ui, &self.theme, elapsed) {
                        self.orchestrator.cancel();
                    }
                }
                _ if self.orchestrator.results_visible() => self.results_ui(ui),
                _ => self.editor_ui(ui),
            }
        });

        if self.orchestrator.state() == AnalysisState::AwaitingCredential {
            self.credential_ui(ctx);
        }

        self.modal.show(ctx, &self.theme, &self.event_bus);
        self.notifications.render(ctx);

        if self.orchestrator.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
