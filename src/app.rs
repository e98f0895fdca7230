use eframe::egui;
use std::sync::Arc;

use crate::render::chart_rows;
use crate::state::app_state::{EditorSettings, EditorState, VERSION};
use crate::state::theme::Theme;
use crate::ui::chart_panel::{self, ChartAction};
use crate::ui::settings_dialog::{self, SettingsDialogState};

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// The main CurveTune application.
pub struct CurveTuneApp {
    pub state: EditorState,
    /// Active settings dialog.
    pub settings_dialog: Option<SettingsDialogState>,
    /// An error message shown in the footer until dismissed.
    pub error_message: Option<String>,
    /// Whether to show the About window (hidden menu).
    pub show_about: bool,
    /// Pending screenshot action (save file or clipboard).
    pending_screenshot: Option<PendingScreenshot>,
}

/// Copy the `rect` region (in points) out of a full-window screenshot as tightly packed RGBA.
/// Without a rect the whole image is returned.
pub(crate) fn crop_rgba(image: &egui::ColorImage, rect: Option<egui::Rect>, ppp: f32) -> (Vec<u8>, usize, usize) {
    let full_w = image.width();
    let full_h = image.height();

    let Some(rect) = rect else {
        let rgba: Vec<u8> = image
            .pixels
            .iter()
            .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
            .collect();
        return (rgba, full_w, full_h);
    };

    let x0 = ((rect.left().max(0.0) * ppp) as usize).min(full_w);
    let y0 = ((rect.top().max(0.0) * ppp) as usize).min(full_h);
    let x1 = ((rect.right() * ppp).ceil() as usize).min(full_w);
    let y1 = ((rect.bottom() * ppp).ceil() as usize).min(full_h);
    let cw = x1.saturating_sub(x0);
    let ch = y1.saturating_sub(y0);
    let mut cropped = Vec::with_capacity(cw * ch * 4);
    for row in y0..y1 {
        for col in x0..x1 {
            let c = image.pixels[row * full_w + col];
            cropped.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }
    (cropped, cw, ch)
}

/// Default export file name, e.g. `interactive-curves-20250101-120000.png`.
fn timestamped_name(extension: &str) -> String {
    format!(
        "interactive-curves-{}.{extension}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Read and validate a settings file. Failures are logged and returned as
/// the footer message.
pub(crate) fn read_settings_file(path: &std::path::Path) -> Result<EditorSettings, String> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read settings {:?}: {e}", path);
        format!("Failed to read file: {e}")
    })?;
    EditorSettings::from_json(&json).map_err(|e| {
        tracing::error!("Failed to parse settings {:?}: {e}", path);
        format!("Failed to parse settings: {e}")
    })
}

impl CurveTuneApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = EditorState::new();

        // --- Global UI style ---
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.text_styles.insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.5));

        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        style.spacing.indent = 20.0;

        ctx.set_style(style);
        ctx.set_visuals(styled_visuals(state.settings.theme));

        tracing::info!("CurveTune v{VERSION} started with {} curves", state.curves.len());

        Self {
            state,
            settings_dialog: None,
            error_message: None,
            show_about: false,
            pending_screenshot: None,
        }
    }

    /// Export the curve table to a CSV file via a save dialog.
    fn export_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(timestamped_name("csv"))
            .add_filter("CSV Files", &["csv"])
            .save_file()
        else {
            return;
        };

        let result = std::fs::File::create(&path)
            .map_err(csv::Error::from)
            .and_then(|file| chart_rows::write_csv(&self.state.curves, file));
        match result {
            Ok(()) => tracing::info!("Exported CSV to {:?}", path),
            Err(e) => {
                tracing::error!("CSV export failed: {e}");
                self.error_message = Some(format!("Failed to export CSV: {e}"));
            }
        }
    }

    /// Put the chart rows on the clipboard as a JSON array.
    fn copy_json(&mut self) {
        let rows = chart_rows::rows_to_json(&self.state.curves);
        let text = match serde_json::to_string_pretty(&rows) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to serialize rows: {e}");
                return;
            }
        };
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => tracing::info!("Copied {} rows to clipboard", self.state.curves.sample_count()),
            Err(e) => {
                tracing::error!("Failed to copy rows to clipboard: {e}");
                self.error_message = Some(format!("Failed to copy to clipboard: {e}"));
            }
        }
    }

    /// Save the editor settings to a JSON file.
    fn save_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("curvetune-settings.json")
            .add_filter("CurveTune Settings", &["json"])
            .save_file()
        else {
            return;
        };

        match self.state.settings.to_json() {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::error!("Failed to save settings: {e}");
                    self.error_message = Some(format!("Failed to save settings: {e}"));
                } else {
                    tracing::info!("Settings saved to {:?}", path);
                }
            }
            Err(e) => tracing::error!("Failed to serialize settings: {e}"),
        }
    }

    /// Load editor settings from a JSON file. Curves are left untouched.
    fn load_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CurveTune Settings", &["json"])
            .pick_file()
        else {
            return;
        };

        match read_settings_file(&path) {
            Ok(settings) => {
                self.state.apply_settings(settings);
                self.settings_dialog = None;
                tracing::info!("Settings loaded from {:?}", path);
            }
            Err(msg) => self.error_message = Some(msg),
        }
    }

    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() {
            return;
        }
        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });
        let Some(color_image) = screenshot_image else {
            return;
        };
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        let (rgba, width, height) = crop_rgba(&color_image, self.state.last_frame_rect, ctx.pixels_per_point());

        match action {
            PendingScreenshot::SaveFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(timestamped_name("png"))
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    if let Some(img) = image::RgbaImage::from_raw(width as u32, height as u32, rgba) {
                        if let Err(e) = img.save(&path) {
                            tracing::error!("Failed to save image: {e}");
                            self.error_message = Some(format!("Failed to save image: {e}"));
                        } else {
                            tracing::info!("Saved screenshot to {:?}", path);
                        }
                    }
                }
            }
            PendingScreenshot::Clipboard => match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    let img_data = arboard::ImageData {
                        width,
                        height,
                        bytes: std::borrow::Cow::Owned(rgba),
                    };
                    if let Err(e) = clipboard.set_image(img_data) {
                        tracing::error!("Failed to copy to clipboard: {e}");
                        self.error_message = Some(format!("Failed to copy to clipboard: {e}"));
                    } else {
                        tracing::info!("Copied screenshot to clipboard");
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to access clipboard: {e}");
                    self.error_message = Some(format!("Failed to access clipboard: {e}"));
                }
            },
        }
    }
}

/// Theme visuals with the app's rounding applied.
fn styled_visuals(theme: Theme) -> egui::Visuals {
    let mut vis = theme.visuals();
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.open.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.bg_stroke = egui::Stroke::new(1.5, egui::Color32::from_gray(160));
    vis.widgets.active.bg_stroke = egui::Stroke::new(2.0, egui::Color32::from_gray(200));
    vis
}

impl eframe::App for CurveTuneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(styled_visuals(self.state.settings.theme));

        // ------------------------------------------------------------------
        // 0. Handle screenshot events from previous frame
        // ------------------------------------------------------------------
        self.handle_screenshot(ctx);

        // --- Header panel ---
        let mut save_settings = false;
        let mut load_settings = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.visuals_mut().override_text_color = Some(ui.visuals().strong_text_color());
                    let heading_response = ui.heading("CurveTune");
                    ui.visuals_mut().override_text_color = None;
                    heading_response.context_menu(|ui| {
                        if ui.button("About CurveTune").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                    });

                    ui.separator();

                    if ui.button("Save Settings").clicked() {
                        save_settings = true;
                    }
                    if ui.button("Load Settings").clicked() {
                        load_settings = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = match self.state.settings.theme {
                            Theme::Dark => "Light Mode",
                            Theme::Light => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            self.state.settings.theme = self.state.settings.theme.toggle();
                        }

                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if save_settings {
            self.save_settings();
        }
        if load_settings {
            self.load_settings();
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let config = self.state.settings.interpolation;
                    ui.label(
                        egui::RichText::new(format!(
                            "{} \u{2022} radius {} \u{2022} {}",
                            config.kind().label(),
                            config.radius(),
                            self.state.settings.resolution.label()
                        ))
                        .weak(),
                    );

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // --- Central panel with the chart card ---
        let mut action = ChartAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let panel_height = ui.available_height();
            egui::ScrollArea::vertical().show(ui, |ui| {
                action = chart_panel::show_chart_panel(&mut self.state, ui, panel_height);
            });
        });

        match action {
            ChartAction::None => {}
            ChartAction::OpenSettings => {
                self.settings_dialog = Some(SettingsDialogState::new(&self.state.settings));
            }
            ChartAction::ExportCsv => self.export_csv(),
            ChartAction::CopyJson => self.copy_json(),
            ChartAction::ExportImageSave => {
                self.pending_screenshot = Some(PendingScreenshot::SaveFile);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            ChartAction::ExportImageClipboard => {
                self.pending_screenshot = Some(PendingScreenshot::Clipboard);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
        }

        // --- Dialogs ---
        if let Some(dialog) = &mut self.settings_dialog {
            if !settings_dialog::show_settings_dialog(ctx, dialog, &mut self.state) {
                self.settings_dialog = None;
            }
        }

        if self.show_about {
            egui::Window::new("About CurveTune")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading(format!("CurveTune v{VERSION}"));
                    ui.label("Drag points on the sensor curves to reshape them.");
                    ui.label("Nearby samples follow with the selected interpolation kernel.");
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: usize, h: usize) -> egui::ColorImage {
        let mut img = egui::ColorImage::new([w, h], egui::Color32::TRANSPARENT);
        img.pixels = (0..w * h)
            .map(|i| egui::Color32::from_rgba_unmultiplied((i % w) as u8, (i / w) as u8, 0, 255))
            .collect();
        img
    }

    #[test]
    fn crop_without_rect_keeps_full_image() {
        let img = gradient(4, 3);
        let (rgba, w, h) = crop_rgba(&img, None, 1.0);
        assert_eq!((w, h), (4, 3));
        assert_eq!(rgba.len(), 4 * 3 * 4);
    }

    #[test]
    fn crop_scales_by_pixels_per_point() {
        let img = gradient(8, 8);
        let rect = egui::Rect::from_min_max(egui::pos2(1.0, 1.0), egui::pos2(3.0, 2.0));
        let (rgba, w, h) = crop_rgba(&img, Some(rect), 2.0);
        assert_eq!((w, h), (4, 2));
        // first pixel is (x=2, y=2)
        assert_eq!(&rgba[..4], &[2, 2, 0, 255]);
    }

    #[test]
    fn crop_clamps_to_image_bounds() {
        let img = gradient(4, 4);
        let rect = egui::Rect::from_min_max(egui::pos2(2.0, 2.0), egui::pos2(50.0, 50.0));
        let (rgba, w, h) = crop_rgba(&img, Some(rect), 1.0);
        assert_eq!((w, h), (2, 2));
        assert_eq!(rgba.len(), 2 * 2 * 4);
    }

    #[test]
    fn missing_settings_file_reports_read_error() {
        let path = std::env::temp_dir().join("curvetune-missing-settings-4f1c.json");
        let _ = std::fs::remove_file(&path);
        let err = read_settings_file(&path).unwrap_err();
        assert!(err.starts_with("Failed to read file:"), "{err}");
    }

    #[test]
    fn invalid_settings_file_reports_parse_error() {
        let path = std::env::temp_dir().join(format!("curvetune-bad-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"interpolation": {"kind": "linear", "radius": 99, "sigma": 1.0}}"#).unwrap();
        let err = read_settings_file(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.starts_with("Failed to parse settings:"), "{err}");
    }

    #[test]
    fn valid_settings_file_loads() {
        let path = std::env::temp_dir().join(format!("curvetune-good-settings-{}.json", std::process::id()));
        let settings = EditorSettings {
            show_hover_points: true,
            ..EditorSettings::default()
        };
        std::fs::write(&path, settings.to_json().unwrap()).unwrap();
        let loaded = read_settings_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Ok(settings));
    }

    #[test]
    fn export_names_carry_extension() {
        let name = timestamped_name("png");
        assert!(name.starts_with("interactive-curves-"));
        assert!(name.ends_with(".png"));
    }
}
