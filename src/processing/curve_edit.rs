use thiserror::Error;

use crate::processing::kernels;
use crate::state::curve::{clamp_value, CurveSet};
use crate::state::interpolation::InterpolationConfig;

/// Share of the edit delta that reaches a neighbour at full kernel weight.
pub const NEIGHBOR_DAMPING: f64 = 0.25;

/// One pointer-driven change to a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EditCommand {
    pub curve_id: String,
    pub sample_index: usize,
    pub new_value: f64,
}

impl EditCommand {
    pub fn new(curve_id: impl Into<String>, sample_index: usize, new_value: f64) -> Self {
        Self {
            curve_id: curve_id.into(),
            sample_index,
            new_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("no curve with id '{0}'")]
    UnknownCurve(String),
    #[error("sample index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("edit value {0} is not a finite number")]
    NonFiniteValue(f64),
}

/// Set one sample and spread a damped share of the change over its neighbourhood.
///
/// Returns a new set; only the edited curve is cloned, every other curve is
/// shared with `curves`. A rejected command leaves the caller's set as is.
pub fn apply_edit(
    curves: &CurveSet,
    command: &EditCommand,
    config: &InterpolationConfig,
) -> Result<CurveSet, EditError> {
    let pos = curves
        .position(&command.curve_id)
        .ok_or_else(|| EditError::UnknownCurve(command.curve_id.clone()))?;
    let len = curves.sample_count();
    let index = command.sample_index;
    if index >= len {
        return Err(EditError::IndexOutOfRange { index, len });
    }
    if !command.new_value.is_finite() {
        return Err(EditError::NonFiniteValue(command.new_value));
    }

    let mut curve = curves
        .shared(pos)
        .map(|c| c.as_ref().clone())
        .ok_or_else(|| EditError::UnknownCurve(command.curve_id.clone()))?;

    let radius = config.radius();
    let samples = curve.samples_mut();
    let old_target = samples[index];
    samples[index] = clamp_value(command.new_value);

    let delta = command.new_value - old_target;
    let start = index.saturating_sub(radius);
    let end = (index + radius).min(len - 1);
    for i in start..=end {
        if i == index {
            continue;
        }
        let distance = i.abs_diff(index);
        let w = kernels::weight(config.kind(), distance, radius, config.sigma());
        let influence = delta * w * NEIGHBOR_DAMPING;
        samples[i] = clamp_value(samples[i] + influence);
    }

    Ok(curves.with_replaced(pos, curve))
}
