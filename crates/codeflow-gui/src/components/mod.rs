pub mod code_editor;
pub mod credential_dialog;
pub mod explanation_panel;
pub mod flowchart_modal;
pub mod flowchart_panel;
pub mod graph_painter;
pub mod loading;
pub mod notifications;
