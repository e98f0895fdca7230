use serde::{Deserialize, Serialize};

use crate::interaction::controller::InteractionController;
use crate::interaction::move_policy::MovePolicy;
use crate::interaction::resolver::CurveResolution;
use crate::state::curve::CurveSet;
use crate::state::interpolation::InterpolationConfig;
use crate::state::theme::Theme;

pub const VERSION: &str = "0.1.0";

/// User-adjustable options. Curve data is deliberately not part of this;
/// curves live only in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub interpolation: InterpolationConfig,
    pub resolution: CurveResolution,
    pub move_policy: MovePolicy,
    pub show_hover_points: bool,
    pub theme: Theme,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            interpolation: InterpolationConfig::default(),
            resolution: CurveResolution::default(),
            move_policy: MovePolicy::default(),
            show_hover_points: false,
            theme: Theme::default(),
        }
    }
}

impl EditorSettings {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Direction for table column sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Everything the chart panel reads and writes, owned by the app and passed down by `&mut`.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub curves: CurveSet,
    pub settings: EditorSettings,
    pub controller: InteractionController,
    pub show_data_table: bool,
    /// Table sort state: (column_index, sort_direction).
    /// None = index order, Some((col, direction)) = sorted.
    pub table_sort: Option<(usize, SortDirection)>,
    /// Screen rect of the chart card (set each frame for screenshot cropping).
    pub last_frame_rect: Option<egui::Rect>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            curves: CurveSet::sensor_defaults(),
            controller: InteractionController::new(settings.move_policy),
            settings,
            show_data_table: false,
            table_sort: None,
            last_frame_rect: None,
        }
    }

    /// Swap in new settings; the interpolation change applies to later edits only.
    pub fn apply_settings(&mut self, settings: EditorSettings) {
        self.controller.set_policy(settings.move_policy);
        self.settings = settings;
    }

    pub fn reset_curves(&mut self) {
        self.curves = CurveSet::sensor_defaults();
        self.controller.reset();
        tracing::info!("Curves reset to sensor defaults");
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::resolver::FirstCurve;
    use crate::state::interpolation::InterpolationKind;

    #[test]
    fn settings_json_round_trip() {
        let settings = EditorSettings {
            interpolation: InterpolationConfig::new(InterpolationKind::Linear, 5, 1.0).unwrap(),
            resolution: CurveResolution::NearestByValue,
            move_policy: MovePolicy::CoalescePerFrame,
            show_hover_points: true,
            theme: Theme::Light,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(EditorSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let parsed = EditorSettings::from_json(r#"{"show_hover_points": true}"#).unwrap();
        assert!(parsed.show_hover_points);
        assert_eq!(parsed.interpolation, InterpolationConfig::default());
    }

    #[test]
    fn invalid_interpolation_fails_to_load() {
        let json = r#"{"interpolation": {"kind": "gaussian", "radius": 0, "sigma": 2.0}}"#;
        assert!(EditorSettings::from_json(json).is_err());
    }

    #[test]
    fn apply_settings_updates_move_policy() {
        let mut state = EditorState::new();
        let settings = EditorSettings {
            move_policy: MovePolicy::CoalescePerFrame,
            ..EditorSettings::default()
        };
        state.apply_settings(settings);
        assert_eq!(state.controller.policy(), MovePolicy::CoalescePerFrame);
    }

    #[test]
    fn reset_curves_drops_selection() {
        let mut state = EditorState::new();
        let curves = state.curves.clone();
        state.controller.pointer_down(&curves, 10, 0.0, None, &FirstCurve);
        let config = state.settings.interpolation;
        state.controller.pointer_move(&mut state.curves, 199.0, &config);
        state.reset_curves();
        assert!(state.controller.selection().target().is_none());
        let fresh = CurveSet::sensor_defaults();
        assert_eq!(state.curves.get("curve1"), fresh.get("curve1"));
    }
}
