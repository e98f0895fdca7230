pub mod curve_edit;
pub mod kernels;
pub mod statistics;
