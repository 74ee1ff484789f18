use crate::components::graph_painter::{self, Highlight};
use crate::theme::{Theme, from_egui_rect, from_pos2, to_vec2};
use codeflow_app::GraphSettings;
use codeflow_core::Flowchart;
use codeflow_events::{Event, EventBus};
use codeflow_graph::{FullscreenCanvas, HitResult, LayoutProjector, Minimap, Rect};
use eframe::egui;
use std::sync::Arc;

const SCROLL_ZOOM_RATE: f32 = 0.0015;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    Fit,
}

/// Fullscreen flowchart window over the scaled projection.
pub struct FlowchartModal {
    open: bool,
    canvas: FullscreenCanvas,
    pending: Vec<ViewCommand>,
    /// True while a drag that started on the minimap is in progress.
    minimap_drag: bool,
}

impl FlowchartModal {
    pub fn new(settings: &GraphSettings) -> Self {
        let projector =
            LayoutProjector::new(settings.fullscreen_scale_x, settings.fullscreen_scale_y);
        Self {
            open: false,
            canvas: FullscreenCanvas::new(projector, settings.show_minimap),
            pending: Vec::new(),
            minimap_drag: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.pending.push(ViewCommand::Fit);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.minimap_drag = false;
        self.canvas.end_drag();
    }

    /// Queues a view change for the next frame, when the canvas size is known.
    pub fn queue(&mut self, command: ViewCommand) {
        self.pending.push(command);
    }

    pub fn set_show_minimap(&mut self, show: bool) {
        self.canvas.set_show_minimap(show);
    }

    pub fn show_minimap(&self) -> bool {
        self.canvas.show_minimap()
    }

    /// Re-seeds from `graph` when its identity changed.
    pub fn sync(&mut self, graph: &Arc<Flowchart>) {
        match self.canvas.sync(graph) {
            Ok(true) => tracing::debug!("fullscreen flowchart re-seeded"),
            Ok(false) => {}
            Err(e) => tracing::warn!("Fullscreen flowchart could not be laid out: {}", e),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme, events: &EventBus) {
        if !self.open {
            return;
        }

        let mut open = self.open;
        egui::Window::new("Flowchart")
            .id(egui::Id::new("flowchart_fullscreen"))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_size([1100.0, 720.0])
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                self.toolbar(ui, theme, events);
                ui.separator();
                self.canvas_ui(ui, theme);
            });

        if !open {
            events.publish(Event::CloseFullscreen);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, theme: &Theme, events: &EventBus) {
        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                self.queue(ViewCommand::ZoomIn);
            }
            if ui.button("Zoom out").clicked() {
                self.queue(ViewCommand::ZoomOut);
            }
            if ui.button("Fit").clicked() {
                self.queue(ViewCommand::Fit);
            }
            let map_label = if self.canvas.show_minimap() {
                "Hide Map"
            } else {
                "Show Map"
            };
            if ui.button(map_label).clicked() {
                events.publish(Event::SetShowMinimap(!self.canvas.show_minimap()));
            }
            ui.label(
                egui::RichText::new(format!("{:.0}%", self.canvas.viewport().zoom * 100.0))
                    .color(theme.muted_text()),
            );

            if let Some(node) = self.canvas.selected_node() {
                ui.separator();
                ui.label(format!("{}: {}", node.visual.caption(), node.label));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    events.publish(Event::CloseFullscreen);
                }
            });
        });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let size = ui.available_size().max(egui::vec2(320.0, 240.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let canvas = from_egui_rect(rect);

        self.canvas.prepare(canvas);
        for command in self.pending.drain(..) {
            match command {
                ViewCommand::ZoomIn => self.canvas.zoom_in(canvas),
                ViewCommand::ZoomOut => self.canvas.zoom_out(canvas),
                ViewCommand::Fit => self.canvas.fit(canvas),
            }
        }

        self.handle_pointer(ui, &response, canvas);

        let hovered = response
            .hover_pos()
            .filter(|_| !self.canvas.is_dragging())
            .map(|pointer| self.canvas.hit_test(from_pos2(pointer), canvas))
            .filter(|hit| *hit != HitResult::None);
        if matches!(hovered, Some(HitResult::Node(_))) {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }

        let painter = ui.painter_at(rect);
        graph_painter::paint_background(&painter, rect, theme);
        graph_painter::paint_scene(
            &painter,
            self.canvas.scene(),
            self.canvas.viewport(),
            rect,
            Highlight {
                selected: self.canvas.selection(),
                hovered,
            },
        );
        if let Some(minimap) = self.canvas.minimap(canvas) {
            graph_painter::paint_minimap(&painter, &minimap, theme);
        }
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, canvas: Rect) {
        let minimap_frame = Minimap::frame_for(canvas);
        let show_map = self.canvas.show_minimap();
        let over_minimap = |pos: egui::Pos2| show_map && minimap_frame.contains(from_pos2(pos));

        if response.drag_started()
            && let Some(origin) = ui.input(|i| i.pointer.press_origin())
        {
            if over_minimap(origin) {
                self.minimap_drag = true;
                self.canvas.minimap_click(from_pos2(origin), canvas);
            } else {
                self.canvas.begin_drag(from_pos2(origin), canvas);
            }
        }

        if response.dragged() {
            if self.minimap_drag {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.canvas.minimap_click(from_pos2(pointer), canvas);
                }
            } else {
                self.canvas.drag_by(to_vec2(response.drag_delta()));
            }
        }

        if response.drag_stopped() {
            self.minimap_drag = false;
            self.canvas.end_drag();
        }

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            if over_minimap(pointer) {
                self.canvas.minimap_click(from_pos2(pointer), canvas);
            } else {
                self.canvas.click(from_pos2(pointer), canvas);
            }
        }

        if let Some(pointer) = response.hover_pos() {
            let factor = ui.input(|i| {
                i.zoom_delta() * (i.smooth_scroll_delta.y * SCROLL_ZOOM_RATE).exp()
            });
            if (factor - 1.0).abs() > f32::EPSILON {
                self.canvas.zoom_at(factor, from_pos2(pointer), canvas);
            }
        }
    }
}
