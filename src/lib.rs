// ABOUTME: Library root for kubeform - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exports;
pub mod images;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod provider;
pub mod transform;
pub mod types;
