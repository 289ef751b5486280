//! Competition showcase console: competition configuration, judge scoring, award curation and
//! the admin API client backing the application catalogue.

pub mod awards;
pub mod client;
pub mod competitions;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
