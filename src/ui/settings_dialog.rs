use crate::interaction::move_policy::MovePolicy;
use crate::interaction::resolver::CurveResolution;
use crate::processing::statistics::CurveStats;
use crate::state::app_state::{EditorSettings, EditorState};
use crate::state::curve::CurveSet;
use crate::state::interpolation::{InterpolationKind, MAX_RADIUS};

/// Persistent state for the settings dialog. Edits go to a draft and only
/// reach the editor on Apply.
pub struct SettingsDialogState {
    pub draft: EditorSettings,
    pub error: String,
    /// Settings as they were when the dialog opened.
    opened_with: EditorSettings,
}

impl SettingsDialogState {
    pub fn new(current: &EditorSettings) -> Self {
        Self {
            draft: current.clone(),
            error: String::new(),
            opened_with: current.clone(),
        }
    }

    /// Apply only the fields edited in the dialog on top of `live`, so changes
    /// made elsewhere while the dialog was open are kept.
    pub fn merged_into(&self, live: &EditorSettings) -> EditorSettings {
        let mut merged = live.clone();
        if self.draft.interpolation != self.opened_with.interpolation {
            merged.interpolation = self.draft.interpolation;
        }
        if self.draft.resolution != self.opened_with.resolution {
            merged.resolution = self.draft.resolution;
        }
        if self.draft.move_policy != self.opened_with.move_policy {
            merged.move_policy = self.draft.move_policy;
        }
        if self.draft.show_hover_points != self.opened_with.show_hover_points {
            merged.show_hover_points = self.draft.show_hover_points;
        }
        merged
    }
}

/// Multi-line statistics report for every curve, in legend order.
pub fn stats_report(curves: &CurveSet) -> String {
    let mut report = String::new();
    for curve in curves.iter() {
        match CurveStats::of_curve(curve) {
            Some(stats) => report.push_str(&stats.report(&curve.name)),
            None => report.push_str(&format!("{}:\n  No samples.\n", curve.name)),
        }
        report.push('\n');
    }
    report
}

/// Show the settings dialog window. Returns `true` while it should stay open,
/// `false` when the user closes it.
pub fn show_settings_dialog(ctx: &egui::Context, dialog: &mut SettingsDialogState, editor: &mut EditorState) -> bool {
    let mut open = true;
    let mut close_requested = false;

    egui::Window::new("Editor Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                // ============================================================
                // SECTION 1: Interpolation
                // ============================================================
                ui.label(egui::RichText::new("Interpolation").strong().size(15.0));
                ui.add_space(4.0);

                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        let mut config = dialog.draft.interpolation;
                        let mut kind = config.kind();
                        let mut radius = config.radius();
                        let mut sigma = config.sigma();

                        egui::Grid::new("interp_grid")
                            .num_columns(2)
                            .spacing([10.0, 6.0])
                            .show(ui, |ui| {
                                ui.label("Method:");
                                ui.horizontal(|ui| {
                                    for k in InterpolationKind::ALL {
                                        ui.radio_value(&mut kind, k, k.label());
                                    }
                                });
                                ui.end_row();

                                ui.label("Radius:");
                                ui.add(egui::Slider::new(&mut radius, 1..=MAX_RADIUS).suffix(" samples"));
                                ui.end_row();

                                ui.label("Sigma:");
                                ui.add_enabled(
                                    kind.uses_sigma(),
                                    egui::DragValue::new(&mut sigma).range(0.1..=10.0).speed(0.05),
                                );
                                ui.end_row();
                            });

                        config = config.with_kind(kind);
                        match config.with_radius(radius).and_then(|c| c.with_sigma(sigma)) {
                            Ok(updated) => {
                                dialog.draft.interpolation = updated;
                                dialog.error.clear();
                            }
                            Err(e) => dialog.error = e.to_string(),
                        }
                    });

                ui.add_space(12.0);

                // ============================================================
                // SECTION 2: Interaction
                // ============================================================
                ui.label(egui::RichText::new("Interaction").strong().size(15.0));
                ui.add_space(4.0);

                egui::Frame::group(ui.style())
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        egui::Grid::new("interaction_grid")
                            .num_columns(2)
                            .spacing([10.0, 6.0])
                            .show(ui, |ui| {
                                ui.label("Click picks:");
                                egui::ComboBox::from_id_salt("resolution_combo")
                                    .selected_text(dialog.draft.resolution.label())
                                    .show_ui(ui, |ui| {
                                        for r in CurveResolution::ALL {
                                            ui.selectable_value(&mut dialog.draft.resolution, r, r.label());
                                        }
                                    });
                                ui.end_row();

                                ui.label("Drag updates:");
                                egui::ComboBox::from_id_salt("move_policy_combo")
                                    .selected_text(dialog.draft.move_policy.label())
                                    .show_ui(ui, |ui| {
                                        for p in MovePolicy::ALL {
                                            ui.selectable_value(&mut dialog.draft.move_policy, p, p.label());
                                        }
                                    });
                                ui.end_row();
                            });
                        ui.checkbox(&mut dialog.draft.show_hover_points, "Show hover points");
                    });

                ui.add_space(12.0);

                // ============================================================
                // SECTION 3: Statistics
                // ============================================================
                egui::CollapsingHeader::new("Statistics")
                    .id_salt("stats_section")
                    .default_open(false)
                    .show(ui, |ui| {
                        egui::Frame::group(ui.style())
                            .inner_margin(egui::Margin::same(8))
                            .show(ui, |ui| {
                                ui.monospace(stats_report(&editor.curves));
                            });
                    });

                ui.add_space(8.0);

                if !dialog.error.is_empty() {
                    ui.colored_label(egui::Color32::from_rgb(255, 80, 80), &dialog.error);
                    ui.add_space(4.0);
                }

                ui.horizontal(|ui| {
                    let can_apply = dialog.error.is_empty();
                    if ui
                        .add_enabled(can_apply, egui::Button::new("Apply").min_size(egui::vec2(100.0, 28.0)))
                        .clicked()
                    {
                        tracing::info!("Applied editor settings");
                        let merged = dialog.merged_into(&editor.settings);
                        editor.apply_settings(merged);
                        close_requested = true;
                    }
                    if ui.add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 28.0))).clicked() {
                        close_requested = true;
                    }
                    if ui.button("Defaults").on_hover_text("Load default settings into the form").clicked() {
                        dialog.draft = EditorSettings {
                            theme: dialog.draft.theme,
                            ..EditorSettings::default()
                        };
                        dialog.error.clear();
                    }
                });
            });
        });

    open && !close_requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::curve::{color_for_index, Curve};

    #[test]
    fn dialog_starts_from_current_settings() {
        let settings = EditorSettings {
            show_hover_points: true,
            move_policy: MovePolicy::CoalescePerFrame,
            ..EditorSettings::default()
        };
        let dialog = SettingsDialogState::new(&settings);
        assert_eq!(dialog.draft, settings);
        assert!(dialog.error.is_empty());
    }

    #[test]
    fn apply_keeps_changes_made_outside_the_dialog() {
        use crate::state::interpolation::InterpolationConfig;
        use crate::state::theme::Theme;

        let mut editor = EditorState::new();
        let dialog = SettingsDialogState::new(&editor.settings);

        let toolbar_config = InterpolationConfig::new(InterpolationKind::Linear, 3, 1.0).unwrap();
        editor.settings.interpolation = toolbar_config;
        editor.settings.theme = editor.settings.theme.toggle();
        editor.settings.show_hover_points = true;

        let merged = dialog.merged_into(&editor.settings);
        editor.apply_settings(merged);

        assert_eq!(editor.settings.interpolation, toolbar_config);
        assert_eq!(editor.settings.theme, Theme::default().toggle());
        assert!(editor.settings.show_hover_points);
    }

    #[test]
    fn apply_takes_fields_edited_in_the_dialog() {
        let mut editor = EditorState::new();
        let mut dialog = SettingsDialogState::new(&editor.settings);
        dialog.draft.move_policy = MovePolicy::CoalescePerFrame;
        dialog.draft.resolution = CurveResolution::NearestByValue;

        editor.settings.show_hover_points = true;
        let merged = dialog.merged_into(&editor.settings);
        editor.apply_settings(merged);

        assert_eq!(editor.settings.move_policy, MovePolicy::CoalescePerFrame);
        assert_eq!(editor.controller.policy(), MovePolicy::CoalescePerFrame);
        assert_eq!(editor.settings.resolution, CurveResolution::NearestByValue);
        assert!(editor.settings.show_hover_points);
    }

    #[test]
    fn stats_report_lists_every_curve() {
        let set = CurveSet::new(vec![
            Curve::new("a", "Alpha", color_for_index(0), vec![0.0, 10.0]),
            Curve::new("b", "Beta", color_for_index(1), vec![4.0, 4.0]),
        ])
        .unwrap();
        let report = stats_report(&set);
        assert!(report.contains("Alpha:\n  Mean: 5.000"));
        assert!(report.contains("Beta:\n  Mean: 4.000"));
        assert!(report.find("Alpha").unwrap() < report.find("Beta").unwrap());
    }
}
