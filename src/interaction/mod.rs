pub mod controller;
pub mod move_policy;
pub mod resolver;
pub mod settle_timer;
