pub mod chart_panel;
pub mod settings_dialog;
