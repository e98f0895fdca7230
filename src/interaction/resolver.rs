use serde::{Deserialize, Serialize};

use crate::state::curve::CurveSet;

/// Picks which curve a pointer-down at `index` / `pointer_value` targets.
pub trait CurveResolver {
    fn resolve(&self, curves: &CurveSet, index: usize, pointer_value: f64) -> Option<String>;
}

/// Always the first curve in legend order, regardless of pointer height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCurve;

impl CurveResolver for FirstCurve {
    fn resolve(&self, curves: &CurveSet, _index: usize, _pointer_value: f64) -> Option<String> {
        curves.first().map(|c| c.id.clone())
    }
}

/// The curve whose sample at `index` is closest to the pointer value.
/// Ties go to the curve drawn first.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestByValue;

impl CurveResolver for NearestByValue {
    fn resolve(&self, curves: &CurveSet, index: usize, pointer_value: f64) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;
        for curve in curves.iter() {
            let Some(v) = curve.value_at(index) else {
                continue;
            };
            let dist = (v - pointer_value).abs();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((curve.id.as_str(), dist));
            }
        }
        best.map(|(id, _)| id.to_string())
    }
}

/// User-selectable resolution strategy, stored in the editor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveResolution {
    FirstCurve,
    NearestByValue,
}

impl Default for CurveResolution {
    fn default() -> Self {
        CurveResolution::FirstCurve
    }
}

impl CurveResolution {
    pub const ALL: [CurveResolution; 2] = [CurveResolution::FirstCurve, CurveResolution::NearestByValue];

    pub fn label(&self) -> &'static str {
        match self {
            CurveResolution::FirstCurve => "First curve",
            CurveResolution::NearestByValue => "Nearest curve",
        }
    }
}

impl CurveResolver for CurveResolution {
    fn resolve(&self, curves: &CurveSet, index: usize, pointer_value: f64) -> Option<String> {
        match self {
            CurveResolution::FirstCurve => FirstCurve.resolve(curves, index, pointer_value),
            CurveResolution::NearestByValue => NearestByValue.resolve(curves, index, pointer_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::curve::{color_for_index, Curve};

    fn stacked() -> CurveSet {
        CurveSet::new(vec![
            Curve::new("low", "Low", color_for_index(0), vec![20.0; 4]),
            Curve::new("mid", "Mid", color_for_index(1), vec![100.0; 4]),
            Curve::new("high", "High", color_for_index(2), vec![180.0; 4]),
        ])
        .unwrap()
    }

    #[test]
    fn first_curve_ignores_pointer_height() {
        let set = stacked();
        assert_eq!(FirstCurve.resolve(&set, 2, 190.0).as_deref(), Some("low"));
        assert_eq!(FirstCurve.resolve(&set, 0, 0.0).as_deref(), Some("low"));
    }

    #[test]
    fn nearest_by_value_picks_closest_sample() {
        let set = stacked();
        assert_eq!(NearestByValue.resolve(&set, 1, 170.0).as_deref(), Some("high"));
        assert_eq!(NearestByValue.resolve(&set, 1, 95.0).as_deref(), Some("mid"));
        assert_eq!(NearestByValue.resolve(&set, 1, 0.0).as_deref(), Some("low"));
    }

    #[test]
    fn nearest_by_value_tie_goes_to_first() {
        let set = stacked();
        assert_eq!(NearestByValue.resolve(&set, 1, 60.0).as_deref(), Some("low"));
    }

    #[test]
    fn out_of_range_index_resolves_nothing_by_value() {
        let set = stacked();
        assert_eq!(NearestByValue.resolve(&set, 99, 60.0), None);
    }

    #[test]
    fn default_resolution_is_first_curve() {
        assert_eq!(CurveResolution::default(), CurveResolution::FirstCurve);
        assert_eq!(CurveResolution::default().resolve(&stacked(), 0, 180.0).as_deref(), Some("low"));
    }
}
