use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Dashed grid, kept faint so the curves dominate.
    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 60),
            Theme::Light => Color32::from_rgb(240, 240, 240),
        }
    }

    /// Outline drawn around hover and selection markers.
    pub fn marker_outline(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(230),
            Theme::Light => Color32::WHITE,
        }
    }

    /// Background of the per-curve statistics cards.
    pub fn card_fill(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(36, 38, 42),
            Theme::Light => Color32::from_rgb(248, 249, 250),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
