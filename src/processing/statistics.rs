use crate::state::curve::{Curve, CurveSet};

/// Summary of one curve, always recomputed from its samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl CurveStats {
    /// `None` for an empty slice.
    pub fn compute(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;

        Some(CurveStats { mean, max, min })
    }

    pub fn of_curve(curve: &Curve) -> Option<Self> {
        Self::compute(curve.samples())
    }

    /// One-decimal card text, e.g. `Avg: 51.3  Max: 180.0  Min: 0.0`.
    pub fn summary_line(&self) -> String {
        format!("Avg: {:.1}  Max: {:.1}  Min: {:.1}", self.mean, self.max, self.min)
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}:\n  Mean: {:.3}\n  Max: {:.3}\n  Min: {:.3}\n  Peak-to-Peak: {:.3}\n",
            label,
            self.mean,
            self.max,
            self.min,
            self.max - self.min
        )
    }
}

/// Stats for every curve in legend order, paired with the curve id.
pub fn compute_all(curves: &CurveSet) -> Vec<(String, CurveStats)> {
    curves
        .iter()
        .filter_map(|c| CurveStats::of_curve(c).map(|s| (c.id.clone(), s)))
        .collect()
}
