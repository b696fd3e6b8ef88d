//! CLI library components for sample metadata intake.

pub mod commands;
pub mod config;
pub mod logging;
