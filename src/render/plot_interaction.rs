use crate::state::curve::{CurveSet, DEFAULT_SAMPLE_COUNT, VALUE_MAX, VALUE_MIN};

/// Fixed affine mapping between chart pixels and (sample index, value).
///
/// X spans the index domain `[0, sample_count - 1]`, Y spans the value domain
/// with `value_max` at `top` and `value_min` at `top + height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub value_min: f64,
    pub value_max: f64,
    pub sample_count: usize,
}

impl Default for ChartGeometry {
    /// Layout of the dashboard card: plot starts 100 px below the card top
    /// and is 350 px tall.
    fn default() -> Self {
        Self {
            left: 20.0,
            top: 100.0,
            width: 990.0,
            height: 350.0,
            value_min: VALUE_MIN,
            value_max: VALUE_MAX,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl ChartGeometry {
    pub fn from_rect(rect: egui::Rect, sample_count: usize) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
            sample_count,
            ..Self::default()
        }
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::Pos2::new(self.left, self.top),
            egui::Vec2::new(self.width, self.height),
        )
    }

    fn value_span(&self) -> f64 {
        self.value_max - self.value_min
    }

    /// Vertical pixel to value. Positions above or below the plot clamp to the domain ends.
    pub fn pixel_to_value(&self, y: f32) -> f64 {
        if self.height <= 0.0 {
            return self.value_min;
        }
        let relative = ((y - self.top) as f64 / self.height as f64).clamp(0.0, 1.0);
        self.value_min + (1.0 - relative) * self.value_span()
    }

    pub fn value_to_pixel(&self, value: f64) -> f32 {
        let span = self.value_span();
        let t = if span.abs() < 1e-15 {
            0.5
        } else {
            (value - self.value_min) / span
        };
        self.top + ((1.0 - t) * self.height as f64) as f32
    }

    /// Horizontal pixel to the nearest sample index, clamped to the index domain.
    pub fn pixel_to_index(&self, x: f32) -> usize {
        if self.sample_count <= 1 || self.width <= 0.0 {
            return 0;
        }
        let last = (self.sample_count - 1) as f64;
        let t = ((x - self.left) as f64 / self.width as f64).clamp(0.0, 1.0);
        (t * last).round() as usize
    }

    pub fn index_to_pixel(&self, index: usize) -> f32 {
        if self.sample_count <= 1 {
            return self.left + self.width * 0.5;
        }
        let t = index as f64 / (self.sample_count - 1) as f64;
        self.left + (t * self.width as f64) as f32
    }

    pub fn to_screen(&self, index: usize, value: f64) -> egui::Pos2 {
        egui::Pos2::new(self.index_to_pixel(index), self.value_to_pixel(value))
    }

    pub fn contains(&self, pos: egui::Pos2) -> bool {
        self.rect().contains(pos)
    }
}

/// Radius of the per-curve markers drawn at the hovered index.
pub const HOVER_POINT_RADIUS: f32 = 6.0;
pub const SELECTED_POINT_RADIUS: f32 = 8.0;

/// The curve whose hover marker at `index` is under `pos`, if any.
/// Markers are tested in legend order, so the first curve wins an overlap.
pub fn hover_point_at(curves: &CurveSet, geometry: &ChartGeometry, index: usize, pos: egui::Pos2) -> Option<String> {
    let hit_radius = HOVER_POINT_RADIUS + 2.0;
    curves
        .iter()
        .find(|c| {
            c.value_at(index)
                .map(|v| geometry.to_screen(index, v).distance(pos) <= hit_radius)
                .unwrap_or(false)
        })
        .map(|c| c.id.clone())
}

/// Compute nice grid line positions for an axis range.
/// Returns (value, is_major) pairs.
pub fn compute_grid_lines(min: f64, max: f64) -> Vec<(f64, bool)> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let raw_step = range / 8.0;
    let order = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / order;
    let nice_step = match normalized {
        n if n <= 1.0 => order,
        n if n <= 2.0 => 2.0 * order,
        n if n <= 5.0 => 5.0 * order,
        _ => 10.0 * order,
    };
    let minor_step = nice_step / 5.0;

    let start = (min / minor_step).floor() as i64;
    let end = (max / minor_step).ceil() as i64;

    (start..=end)
        .map(|i| i as f64 * minor_step)
        .filter(|v| *v >= min && *v <= max)
        .map(|v| {
            let is_major = ((v / nice_step).round() * nice_step - v).abs() < nice_step * 0.01;
            (v, is_major)
        })
        .collect()
}

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val == 0.0 {
        return "0".to_string();
    }
    let s = format!("{val:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_geometry_maps_top_and_bottom() {
        let g = ChartGeometry::default();
        assert_relative_eq!(g.pixel_to_value(100.0), 200.0);
        assert_relative_eq!(g.pixel_to_value(450.0), 0.0);
        assert_relative_eq!(g.pixel_to_value(275.0), 100.0);
    }

    #[test]
    fn pixels_outside_plot_clamp() {
        let g = ChartGeometry::default();
        assert_relative_eq!(g.pixel_to_value(-40.0), 200.0);
        assert_relative_eq!(g.pixel_to_value(900.0), 0.0);
    }

    #[test]
    fn value_pixel_round_trip() {
        let g = ChartGeometry::default();
        for v in [0.0, 12.5, 99.0, 150.25, 200.0] {
            assert_relative_eq!(g.pixel_to_value(g.value_to_pixel(v)), v, epsilon = 1e-3);
        }
    }

    #[test]
    fn index_mapping_rounds_to_nearest_sample() {
        let g = ChartGeometry::default();
        assert_eq!(g.pixel_to_index(20.0), 0);
        assert_eq!(g.pixel_to_index(1010.0), 99);
        assert_eq!(g.pixel_to_index(24.0), 0);
        assert_eq!(g.pixel_to_index(26.0), 1);
        assert_eq!(g.pixel_to_index(-500.0), 0);
        assert_eq!(g.pixel_to_index(5000.0), 99);
        for i in [0, 1, 42, 99] {
            assert_eq!(g.pixel_to_index(g.index_to_pixel(i)), i);
        }
    }

    #[test]
    fn degenerate_geometry_does_not_divide_by_zero() {
        let g = ChartGeometry {
            height: 0.0,
            width: 0.0,
            ..ChartGeometry::default()
        };
        assert_eq!(g.pixel_to_value(10.0), 0.0);
        assert_eq!(g.pixel_to_index(10.0), 0);
    }

    #[test]
    fn hover_marker_hit_test() {
        use crate::state::curve::{color_for_index, Curve};
        let set = CurveSet::new(vec![
            Curve::new("a", "A", color_for_index(0), vec![50.0; 100]),
            Curve::new("b", "B", color_for_index(1), vec![150.0; 100]),
        ])
        .unwrap();
        let g = ChartGeometry::default();
        let on_b = g.to_screen(30, 150.0);
        assert_eq!(hover_point_at(&set, &g, 30, on_b).as_deref(), Some("b"));
        let near_a = g.to_screen(30, 50.0) + egui::vec2(3.0, -3.0);
        assert_eq!(hover_point_at(&set, &g, 30, near_a).as_deref(), Some("a"));
        let between = g.to_screen(30, 100.0);
        assert_eq!(hover_point_at(&set, &g, 30, between), None);
    }

    #[test]
    fn grid_lines_cover_value_domain() {
        let lines = compute_grid_lines(0.0, 200.0);
        let majors: Vec<f64> = lines.iter().filter(|(_, m)| *m).map(|(v, _)| *v).collect();
        assert_eq!(majors.first().copied(), Some(0.0));
        assert_eq!(majors.last().copied(), Some(200.0));
        assert!(compute_grid_lines(5.0, 5.0).is_empty());
    }

    #[test]
    fn tick_labels_trim_zeros() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(50.0), "50");
        assert_eq!(format_tick_value(2.5), "2.5");
    }
}
