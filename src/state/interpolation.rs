use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest neighbourhood half-width the settings surface offers.
pub const MAX_RADIUS: usize = 15;

pub const DEFAULT_RADIUS: usize = 8;
pub const DEFAULT_SIGMA: f64 = 2.5;

/// Kernel family used to spread an edit over neighbouring samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    Gaussian,
    Linear,
    Constant,
}

impl Default for InterpolationKind {
    fn default() -> Self {
        InterpolationKind::Gaussian
    }
}

impl InterpolationKind {
    pub const ALL: [InterpolationKind; 3] = [
        InterpolationKind::Gaussian,
        InterpolationKind::Linear,
        InterpolationKind::Constant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterpolationKind::Gaussian => "Gaussian",
            InterpolationKind::Linear => "Linear",
            InterpolationKind::Constant => "Constant",
        }
    }

    /// Only the gaussian kernel reads sigma.
    pub fn uses_sigma(&self) -> bool {
        matches!(self, InterpolationKind::Gaussian)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("radius must be between 1 and {MAX_RADIUS}, got {0}")]
    RadiusOutOfRange(usize),
    #[error("sigma must be a positive finite number, got {0}")]
    InvalidSigma(f64),
}

/// Process-wide interpolation settings, read by every edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterpolationConfig")]
pub struct InterpolationConfig {
    kind: InterpolationKind,
    radius: usize,
    sigma: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            kind: InterpolationKind::default(),
            radius: DEFAULT_RADIUS,
            sigma: DEFAULT_SIGMA,
        }
    }
}

impl InterpolationConfig {
    pub fn new(kind: InterpolationKind, radius: usize, sigma: f64) -> Result<Self, ConfigError> {
        if radius == 0 || radius > MAX_RADIUS {
            return Err(ConfigError::RadiusOutOfRange(radius));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ConfigError::InvalidSigma(sigma));
        }
        Ok(Self { kind, radius, sigma })
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn with_kind(self, kind: InterpolationKind) -> Self {
        Self { kind, ..self }
    }

    pub fn with_radius(self, radius: usize) -> Result<Self, ConfigError> {
        Self::new(self.kind, radius, self.sigma)
    }

    pub fn with_sigma(self, sigma: f64) -> Result<Self, ConfigError> {
        Self::new(self.kind, self.radius, sigma)
    }
}

/// Unvalidated wire form; deserialization funnels through `InterpolationConfig::new`.
#[derive(Deserialize)]
struct RawInterpolationConfig {
    kind: InterpolationKind,
    radius: usize,
    #[serde(default = "default_sigma")]
    sigma: f64,
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

impl TryFrom<RawInterpolationConfig> for InterpolationConfig {
    type Error = ConfigError;

    fn try_from(raw: RawInterpolationConfig) -> Result<Self, Self::Error> {
        InterpolationConfig::new(raw.kind, raw.radius, raw.sigma)
    }
}
