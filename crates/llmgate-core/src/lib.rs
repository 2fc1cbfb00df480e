//! Core building blocks for llmgate.
//!
//! - [`config`] — provider selection and per-provider settings
//! - [`types`] — chat messages and invoker inputs
//! - [`utils`] — data paths and log previews

pub mod config;
pub mod types;
pub mod utils;
