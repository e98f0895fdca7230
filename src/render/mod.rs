pub mod chart_rows;
pub mod plot_interaction;
