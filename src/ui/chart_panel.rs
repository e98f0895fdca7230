use std::time::Duration;

use crate::processing::statistics;
use crate::render::chart_rows::{chart_rows, ChartRow};
use crate::render::plot_interaction::{self, ChartGeometry, HOVER_POINT_RADIUS, SELECTED_POINT_RADIUS};
use crate::state::app_state::{EditorState, SortDirection};
use crate::state::curve::{VALUE_MAX, VALUE_MIN};
use crate::state::interpolation::{InterpolationKind, MAX_RADIUS};
use crate::state::theme::Theme;

/// Actions that the chart panel can request from the parent.
pub enum ChartAction {
    None,
    OpenSettings,
    ExportCsv,
    CopyJson,
    ExportImageSave,
    ExportImageClipboard,
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Helper to create a selected/toggled toolbar button.
fn toolbar_toggle_btn(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(0.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
    };
    ui.add(btn)
}

/// Render the dashboard card. Returns an action if the user clicked a button
/// that needs the app (dialogs, exports).
pub fn show_chart_panel(state: &mut EditorState, ui: &mut egui::Ui, panel_height: f32) -> ChartAction {
    let mut action = ChartAction::None;
    let theme = state.settings.theme;

    let frame_resp = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.heading("Interactive Sensor Dashboard");
            ui.label(
                egui::RichText::new(
                    "Hover over curves to see points \u{2022} Click and drag to modify \u{2022} Configurable interpolation",
                )
                .small()
                .italics()
                .weak(),
            );
            ui.add_space(4.0);

            // --- Toolbar row ---
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                show_interpolation_controls(ui, state);

                ui.separator();
                ui.checkbox(&mut state.settings.show_hover_points, "Show hover points");
                ui.separator();

                if toolbar_btn(ui, "Settings").on_hover_text("Interpolation and interaction settings").clicked() {
                    action = ChartAction::OpenSettings;
                }
                let table_active = state.show_data_table;
                if toolbar_toggle_btn(ui, if table_active { "Chart View" } else { "Table View" }, table_active)
                    .on_hover_text("Toggle between chart and data table")
                    .clicked()
                {
                    state.show_data_table = !state.show_data_table;
                }

                ui.separator();

                let export_popup_id = ui.make_persistent_id("export_popup");
                let export_btn_resp = toolbar_btn(ui, "Export").on_hover_text("Export data or image");
                if export_btn_resp.clicked() {
                    ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                }
                egui::popup_below_widget(ui, export_popup_id, &export_btn_resp, egui::PopupCloseBehavior::CloseOnClickOutside, |ui| {
                    ui.set_min_width(160.0);
                    if ui.button("Save as PNG").clicked() {
                        action = ChartAction::ExportImageSave;
                        ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                    }
                    if ui.button("Copy Image").clicked() {
                        action = ChartAction::ExportImageClipboard;
                        ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                    }
                    if ui.button("Save as CSV").clicked() {
                        action = ChartAction::ExportCsv;
                        ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                    }
                    if ui.button("Copy Data (JSON)").clicked() {
                        action = ChartAction::CopyJson;
                        ui.memory_mut(|m| m.toggle_popup(export_popup_id));
                    }
                });

                let reset_btn = egui::Button::new(
                    egui::RichText::new("Reset Curves").color(egui::Color32::from_rgb(220, 60, 60)),
                )
                .min_size(egui::vec2(0.0, 26.0));
                if ui.add(reset_btn).on_hover_text("Regenerate the sensor curves").clicked() {
                    state.reset_curves();
                }
            });

            ui.add_space(4.0);

            // Room for the header rows and the stats strip
            let chart_height = (panel_height - 230.0).max(220.0);

            if state.show_data_table {
                show_table_view(state, ui, chart_height);
            } else {
                show_chart(state, ui, &theme, chart_height);
            }

            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(format!(
                    "{} curves \u{00d7} {} points each",
                    state.curves.len(),
                    state.curves.sample_count()
                ))
                .small()
                .weak(),
            );
            ui.add_space(6.0);
            show_stats_strip(state, ui, &theme);
        });
    state.last_frame_rect = Some(frame_resp.response.rect);

    action
}

fn show_interpolation_controls(ui: &mut egui::Ui, state: &mut EditorState) {
    let mut config = state.settings.interpolation;

    ui.label(egui::RichText::new("Interpolation:").strong());
    let mut kind = config.kind();
    egui::ComboBox::from_id_salt("interpolation_kind")
        .selected_text(kind.label())
        .width(90.0)
        .show_ui(ui, |ui| {
            for k in InterpolationKind::ALL {
                ui.selectable_value(&mut kind, k, k.label());
            }
        });
    config = config.with_kind(kind);

    ui.label(egui::RichText::new("Radius:").strong());
    let mut radius = config.radius();
    ui.add(egui::Slider::new(&mut radius, 1..=MAX_RADIUS));
    if let Ok(updated) = config.with_radius(radius) {
        config = updated;
    }

    if kind.uses_sigma() {
        ui.label(egui::RichText::new("Sigma:").strong());
        let mut sigma = config.sigma();
        ui.add(egui::DragValue::new(&mut sigma).range(0.1..=10.0).speed(0.05));
        if let Ok(updated) = config.with_sigma(sigma) {
            config = updated;
        }
    }

    if config != state.settings.interpolation {
        tracing::debug!(
            "Interpolation set to {} (radius {}, sigma {:.2})",
            config.kind().label(),
            config.radius(),
            config.sigma()
        );
        state.settings.interpolation = config;
    }
}

// ---------------------------------------------------------------------------
// Pointer handling
// ---------------------------------------------------------------------------

/// Feed one frame's events through the controller in dispatch order.
/// `on_chart_layer` tells whether a position belongs to the chart rather than
/// a window or popup drawn above it; presses and hovers elsewhere are ignored.
/// Returns true when the curves changed.
pub(crate) fn handle_pointer_events(
    state: &mut EditorState,
    geometry: &ChartGeometry,
    on_chart_layer: &dyn Fn(egui::Pos2) -> bool,
    card_rect: Option<egui::Rect>,
    events: &[egui::Event],
    now: f64,
) -> bool {
    let mut changed = false;

    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => {
                if !geometry.contains(*pos) || !on_chart_layer(*pos) {
                    continue;
                }
                let index = geometry.pixel_to_index(pos.x);
                let value = geometry.pixel_to_value(pos.y);
                let explicit = if state.settings.show_hover_points {
                    state
                        .controller
                        .hovered_index()
                        .and_then(|h| plot_interaction::hover_point_at(&state.curves, geometry, h, *pos))
                } else {
                    None
                };
                let resolution = state.settings.resolution;
                state
                    .controller
                    .pointer_down(&state.curves, index, value, explicit.as_deref(), &resolution);
            }
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => {
                state.controller.pointer_up(now);
            }
            egui::Event::PointerMoved(pos) => {
                let hovered = if state.settings.show_hover_points && geometry.contains(*pos) && on_chart_layer(*pos) {
                    Some(geometry.pixel_to_index(pos.x))
                } else {
                    None
                };
                state.controller.set_hovered_index(hovered);

                if !state.controller.is_dragging() {
                    continue;
                }
                if card_rect.is_some_and(|card| !card.contains(*pos)) {
                    state.controller.pointer_leave(now);
                    continue;
                }
                let value = geometry.pixel_to_value(pos.y);
                let config = state.settings.interpolation;
                changed |= state.controller.pointer_move(&mut state.curves, value, &config);
            }
            egui::Event::PointerGone => {
                state.controller.set_hovered_index(None);
                state.controller.pointer_leave(now);
            }
            _ => {}
        }
    }

    changed
}

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

fn show_chart(state: &mut EditorState, ui: &mut egui::Ui, theme: &Theme, chart_height: f32) {
    let left_margin = 50.0_f32;
    let right_margin = 30.0_f32;
    let top_margin = 20.0_f32;
    let bottom_margin = 56.0_f32;

    let available_width = ui.available_width();
    let total_rect = ui.allocate_space(egui::Vec2::new(available_width, chart_height)).1;
    let plot_rect = egui::Rect::from_min_max(
        egui::Pos2::new(total_rect.left() + left_margin, total_rect.top() + top_margin),
        egui::Pos2::new(total_rect.right() - right_margin, total_rect.bottom() - bottom_margin),
    );
    let geometry = ChartGeometry::from_rect(plot_rect, state.curves.sample_count());

    // --- Pointer interaction ---
    let plot_id = ui.id().with("curve_chart");
    let response = ui.interact(plot_rect, plot_id, egui::Sense::click_and_drag());
    let (events, now) = ui.input(|i| (i.events.clone(), i.time));
    let card_rect = state.last_frame_rect;
    let chart_layer = ui.layer_id();
    let ctx = ui.ctx().clone();
    let on_chart_layer = |pos: egui::Pos2| ctx.layer_id_at(pos).map_or(true, |layer| layer == chart_layer);
    handle_pointer_events(state, &geometry, &on_chart_layer, card_rect, &events, now);

    let config = state.settings.interpolation;
    state.controller.flush(&mut state.curves, &config);
    if state.controller.tick(now) {
        tracing::debug!("Selection cleared");
    }
    if let Some(deadline) = state.controller.settle_deadline() {
        ui.ctx()
            .request_repaint_after(Duration::from_secs_f64((deadline - now).max(0.0)));
    }

    if state.controller.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if response.hovered() && state.settings.show_hover_points {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    // --- Drawing ---
    let painter = ui.painter_at(total_rect);
    painter.rect_filled(plot_rect, 0.0, theme.plot_bg());

    let x_grid = plot_interaction::compute_grid_lines(0.0, (state.curves.sample_count().max(2) - 1) as f64);
    let y_grid = plot_interaction::compute_grid_lines(VALUE_MIN, VALUE_MAX);
    draw_grid_and_axes(&painter, &geometry, theme, &x_grid, &y_grid);

    let rows = chart_rows(&state.curves);
    draw_curves(&painter, state, &geometry, &rows);
    draw_markers(&painter, state, &geometry, theme);
    draw_legend(&painter, state, plot_rect, total_rect);
}

fn draw_grid_and_axes(
    painter: &egui::Painter,
    geometry: &ChartGeometry,
    theme: &Theme,
    x_grid: &[(f64, bool)],
    y_grid: &[(f64, bool)],
) {
    let plot_rect = geometry.rect();
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.6);
    let grid_stroke = egui::Stroke::new(1.0, theme.grid_color());

    for &(xval, is_major) in x_grid {
        if !is_major {
            continue;
        }
        let x = geometry.index_to_pixel(xval.round() as usize);
        painter.extend(egui::Shape::dashed_line(
            &[egui::Pos2::new(x, plot_rect.top()), egui::Pos2::new(x, plot_rect.bottom())],
            grid_stroke,
            3.0,
            3.0,
        ));
        painter.text(
            egui::Pos2::new(x, plot_rect.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            plot_interaction::format_tick_value(xval),
            egui::FontId::proportional(12.0),
            dim_color,
        );
    }

    for &(yval, is_major) in y_grid {
        if !is_major {
            continue;
        }
        let y = geometry.value_to_pixel(yval);
        painter.extend(egui::Shape::dashed_line(
            &[egui::Pos2::new(plot_rect.left(), y), egui::Pos2::new(plot_rect.right(), y)],
            grid_stroke,
            3.0,
            3.0,
        ));
        painter.text(
            egui::Pos2::new(plot_rect.left() - 6.0, y),
            egui::Align2::RIGHT_CENTER,
            plot_interaction::format_tick_value(yval),
            egui::FontId::proportional(12.0),
            dim_color,
        );
    }

    painter.rect_stroke(plot_rect, 0.0, egui::Stroke::new(1.0, dim_color), egui::StrokeKind::Outside);
}

fn draw_curves(painter: &egui::Painter, state: &EditorState, geometry: &ChartGeometry, rows: &[ChartRow]) {
    for (k, curve) in state.curves.iter().enumerate() {
        let points: Vec<egui::Pos2> = rows
            .iter()
            .filter_map(|row| row.values.get(k).map(|&v| geometry.to_screen(row.index, v)))
            .collect();
        painter.add(egui::Shape::line(points, egui::Stroke::new(3.0, curve.color32())));
    }
}

/// Hover markers at the hovered index and the highlighted selection.
fn draw_markers(painter: &egui::Painter, state: &EditorState, geometry: &ChartGeometry, theme: &Theme) {
    let outline = theme.marker_outline();

    if state.settings.show_hover_points {
        if let Some(index) = state.controller.hovered_index() {
            for curve in state.curves.iter() {
                let Some(value) = curve.value_at(index) else {
                    continue;
                };
                let center = geometry.to_screen(index, value);
                painter.circle_filled(center, HOVER_POINT_RADIUS, curve.color32().gamma_multiply(0.7));
                painter.circle_stroke(center, HOVER_POINT_RADIUS, egui::Stroke::new(2.0, outline));
            }
        }
    }

    if let Some((curve_id, index)) = state.controller.selection().target() {
        let selected = state
            .curves
            .get(curve_id)
            .and_then(|c| c.value_at(index).map(|v| (c.color32(), v)));
        if let Some((color, value)) = selected {
            let center = geometry.to_screen(index, value);
            painter.circle_filled(center + egui::vec2(0.0, 3.0), SELECTED_POINT_RADIUS, egui::Color32::from_black_alpha(60));
            painter.circle_filled(center, SELECTED_POINT_RADIUS, color);
            painter.circle_stroke(center, SELECTED_POINT_RADIUS, egui::Stroke::new(3.0, outline));
        }
    }
}

/// Single legend row centered under the plot.
fn draw_legend(painter: &egui::Painter, state: &EditorState, plot_rect: egui::Rect, total_rect: egui::Rect) {
    if state.curves.is_empty() {
        return;
    }

    let text_color = painter.ctx().style().visuals.text_color();
    let font = egui::FontId::proportional(12.0);
    let entries: Vec<(egui::Color32, std::sync::Arc<egui::Galley>)> = state
        .curves
        .iter()
        .map(|c| (c.color32(), painter.layout_no_wrap(c.name.clone(), font.clone(), text_color)))
        .collect();

    let swatch = 12.0_f32;
    let gap = 16.0_f32;
    let total_width: f32 = entries
        .iter()
        .map(|(_, g)| swatch + 4.0 + g.rect.width())
        .sum::<f32>()
        + gap * (entries.len() as f32 - 1.0);

    let y = total_rect.bottom() - 14.0;
    let mut x = plot_rect.center().x - total_width / 2.0;
    for (color, galley) in entries {
        let swatch_rect = egui::Rect::from_center_size(
            egui::Pos2::new(x + swatch / 2.0, y),
            egui::Vec2::splat(swatch),
        );
        painter.rect_filled(swatch_rect, 2.0, color);
        let width = galley.rect.width();
        painter.galley(
            egui::Pos2::new(x + swatch + 4.0, y - galley.rect.height() / 2.0),
            galley,
            color,
        );
        x += swatch + 4.0 + width + gap;
    }
}

// ---------------------------------------------------------------------------
// Statistics strip
// ---------------------------------------------------------------------------

fn show_stats_strip(state: &EditorState, ui: &mut egui::Ui, theme: &Theme) {
    let stats = statistics::compute_all(&state.curves);
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 12.0;
        for (curve_id, s) in &stats {
            let Some(curve) = state.curves.get(curve_id) else {
                continue;
            };
            egui::Frame::group(ui.style())
                .fill(theme.card_fill())
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(ui, |ui| {
                    ui.set_min_width(120.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&curve.name).strong().color(curve.color32()));
                        ui.label(egui::RichText::new(s.summary_line()).small().monospace());
                    });
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Table view
// ---------------------------------------------------------------------------

fn cycle_sort(state: &mut EditorState, col: usize) {
    state.table_sort = match state.table_sort {
        Some((c, SortDirection::Ascending)) if c == col => Some((col, SortDirection::Descending)),
        Some((c, SortDirection::Descending)) if c == col => None,
        _ => Some((col, SortDirection::Ascending)),
    };
}

/// Column 0 is the sample index, column k is the (k-1)-th curve.
fn table_value(row: &ChartRow, col: usize) -> f64 {
    if col == 0 {
        row.index as f64
    } else {
        row.values.get(col - 1).copied().unwrap_or(f64::NAN)
    }
}

pub(crate) fn sorted_rows(rows: &mut [ChartRow], sort: Option<(usize, SortDirection)>) {
    if let Some((col, dir)) = sort {
        rows.sort_by(|a, b| {
            let cmp = table_value(a, col)
                .partial_cmp(&table_value(b, col))
                .unwrap_or(std::cmp::Ordering::Equal);
            match dir {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        });
    }
}

fn show_table_view(state: &mut EditorState, ui: &mut egui::Ui, height: f32) {
    use egui_extras::{Column, TableBuilder};

    let mut rows = chart_rows(&state.curves);
    sorted_rows(&mut rows, state.table_sort);

    let names: Vec<String> = state.curves.iter().map(|c| c.name.clone()).collect();
    let num_cols = names.len() + 1;
    let current_sort = state.table_sort;
    let clicked_col: std::cell::Cell<Option<usize>> = std::cell::Cell::new(None);

    let arrow = |col: usize| match current_sort {
        Some((c, SortDirection::Ascending)) if c == col => " ^",
        Some((c, SortDirection::Descending)) if c == col => " v",
        _ => "",
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(100.0), num_cols)
        .min_scrolled_height(height)
        .max_scroll_height(height)
        .header(20.0, |mut header| {
            header.col(|ui| {
                if ui.button(format!("Index{}", arrow(0))).clicked() {
                    clicked_col.set(Some(0));
                }
            });
            for (i, name) in names.iter().enumerate() {
                header.col(|ui| {
                    if ui.button(format!("{name}{}", arrow(i + 1))).clicked() {
                        clicked_col.set(Some(i + 1));
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut table_row| {
                let row = &rows[table_row.index()];
                table_row.col(|ui| {
                    ui.label(row.index.to_string());
                });
                for v in &row.values {
                    table_row.col(|ui| {
                        ui.label(format!("{v:.3}"));
                    });
                }
            });
        });

    if let Some(col) = clicked_col.get() {
        cycle_sort(state, col);
    }
}
