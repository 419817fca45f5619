//! Case intake for body-worn aid applications submitted through the workflow engine.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
