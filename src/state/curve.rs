use std::sync::Arc;

use thiserror::Error;

/// Closed value range every sample is kept inside.
pub const VALUE_MIN: f64 = 0.0;
pub const VALUE_MAX: f64 = 200.0;

/// Samples per curve on the dashboard chart.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Legend colors of the three sensor curves, followed by spares for added curves.
pub const COLOR_PALETTE: [[u8; 4]; 6] = [
    [136, 132, 216, 255], // Lavender
    [130, 202, 157, 255], // Mint
    [255, 198, 88, 255],  // Amber
    [255, 128, 66, 255],  // Orange
    [0, 136, 254, 255],   // Blue
    [255, 99, 132, 255],  // Rose
];

pub fn color_for_index(index: usize) -> [u8; 4] {
    COLOR_PALETTE[index % COLOR_PALETTE.len()]
}

pub fn clamp_value(value: f64) -> f64 {
    value.clamp(VALUE_MIN, VALUE_MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub id: String,
    pub name: String,
    pub color: [u8; 4],
    samples: Vec<f64>,
}

impl Curve {
    /// Samples are clamped into the value range on the way in.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: [u8; 4], samples: Vec<f64>) -> Self {
        let samples = samples
            .into_iter()
            .map(|v| if v.is_finite() { clamp_value(v) } else { VALUE_MIN })
            .collect();
        Self {
            id: id.into(),
            name: name.into(),
            color,
            samples,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    pub fn color32(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.color[0], self.color[1], self.color[2], self.color[3])
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveSetError {
    #[error("a curve set needs at least one curve")]
    Empty,
    #[error("curve '{0}' has no samples")]
    NoSamples(String),
    #[error("curve '{id}' has {found} samples, expected {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("duplicate curve id '{0}'")]
    DuplicateId(String),
}

/// Ordered curves sharing one length. Curves sit behind `Arc` so an edit
/// replaces only the curve it touches.
#[derive(Debug, Clone)]
pub struct CurveSet {
    curves: Vec<Arc<Curve>>,
    sample_count: usize,
}

impl CurveSet {
    pub fn new(curves: Vec<Curve>) -> Result<Self, CurveSetError> {
        let first = curves.first().ok_or(CurveSetError::Empty)?;
        let sample_count = first.len();
        if sample_count == 0 {
            return Err(CurveSetError::NoSamples(first.id.clone()));
        }

        for (i, curve) in curves.iter().enumerate() {
            if curve.len() != sample_count {
                return Err(CurveSetError::LengthMismatch {
                    id: curve.id.clone(),
                    expected: sample_count,
                    found: curve.len(),
                });
            }
            if curves[..i].iter().any(|c| c.id == curve.id) {
                return Err(CurveSetError::DuplicateId(curve.id.clone()));
            }
        }

        Ok(Self {
            curves: curves.into_iter().map(Arc::new).collect(),
            sample_count,
        })
    }

    /// The three sensor curves the dashboard starts with.
    pub fn sensor_defaults() -> Self {
        let curves = vec![
            mock_curve("curve1", "Sensor 1", color_for_index(0), 1.0, 80.0, 0.08),
            mock_curve("curve2", "Sensor 2", color_for_index(1), 2.0, 60.0, 0.12),
            mock_curve("curve3", "Sensor 3", color_for_index(2), 3.0, 40.0, 0.15),
        ];
        Self {
            curves: curves.into_iter().map(Arc::new).collect(),
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Curve> {
        self.curves.iter().map(|c| c.as_ref())
    }

    pub fn first(&self) -> Option<&Curve> {
        self.curves.first().map(|c| c.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&Curve> {
        self.iter().find(|c| c.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.curves.iter().position(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.curves.iter().map(|c| c.id.clone()).collect()
    }

    /// Shared handle to the curve at `pos`; used to check which curves an edit replaced.
    pub fn shared(&self, pos: usize) -> Option<&Arc<Curve>> {
        self.curves.get(pos)
    }

    /// Copy of this set with the curve at `pos` swapped for `curve`.
    pub(crate) fn with_replaced(&self, pos: usize, curve: Curve) -> Self {
        let mut curves = self.curves.clone();
        curves[pos] = Arc::new(curve);
        Self {
            curves,
            sample_count: self.sample_count,
        }
    }
}

impl Default for CurveSet {
    fn default() -> Self {
        Self::sensor_defaults()
    }
}

/// Smooth sensor-like signal: two sine components plus a slow trend, clamped.
fn mock_curve(id: &str, name: &str, color: [u8; 4], seed: f64, amplitude: f64, frequency: f64) -> Curve {
    let samples = (0..DEFAULT_SAMPLE_COUNT)
        .map(|i| {
            let t = i as f64;
            let wave = ((t * frequency + seed).sin() + (t * frequency * 2.3 + seed * 1.7).sin()) * amplitude;
            let trend = (t * 0.05 + seed).sin() * 30.0;
            50.0 + wave + trend
        })
        .collect();
    Curve::new(id, name, color, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(id: &str, len: usize, value: f64) -> Curve {
        Curve::new(id, id, color_for_index(0), vec![value; len])
    }

    #[test]
    fn samples_are_clamped_on_construction() {
        let c = Curve::new("a", "A", [0; 4], vec![-5.0, 50.0, 250.0, f64::NAN]);
        assert_eq!(c.samples(), &[0.0, 50.0, 200.0, 0.0]);
    }

    #[test]
    fn rejects_empty_set() {
        assert_eq!(CurveSet::new(Vec::new()).unwrap_err(), CurveSetError::Empty);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = CurveSet::new(vec![flat("a", 5, 1.0), flat("b", 4, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            CurveSetError::LengthMismatch {
                id: "b".into(),
                expected: 5,
                found: 4
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = CurveSet::new(vec![flat("a", 3, 1.0), flat("a", 3, 2.0)]).unwrap_err();
        assert_eq!(err, CurveSetError::DuplicateId("a".into()));
    }

    #[test]
    fn rejects_zero_length_curves() {
        let err = CurveSet::new(vec![flat("a", 0, 1.0)]).unwrap_err();
        assert_eq!(err, CurveSetError::NoSamples("a".into()));
    }

    #[test]
    fn sensor_defaults_are_in_range() {
        let set = CurveSet::sensor_defaults();
        assert_eq!(set.len(), 3);
        assert_eq!(set.sample_count(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(set.ids(), vec!["curve1", "curve2", "curve3"]);
        for curve in set.iter() {
            assert_eq!(curve.len(), DEFAULT_SAMPLE_COUNT);
            assert!(curve.samples().iter().all(|v| (VALUE_MIN..=VALUE_MAX).contains(v)));
        }
    }

    #[test]
    fn sensor_defaults_are_reproducible() {
        let a = CurveSet::sensor_defaults();
        let b = CurveSet::sensor_defaults();
        for (ca, cb) in a.iter().zip(b.iter()) {
            assert_eq!(ca, cb);
        }
    }
}
