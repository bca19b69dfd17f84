// src/lib.rs — Library root for Optiscope

pub mod cli;
pub mod core;
pub mod infra;
pub mod listener;
pub mod prompt;
pub mod provider;
pub mod telemetry;
pub mod util;
