pub mod average_weight;
pub mod config;
pub mod detect;
pub mod log;
pub mod uploads;
