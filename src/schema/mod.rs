//! Schema module - Configuration types for animation jobs.

mod config;

pub use config::*;
