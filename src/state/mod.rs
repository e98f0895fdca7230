pub mod app_state;
pub mod curve;
pub mod interpolation;
pub mod theme;
