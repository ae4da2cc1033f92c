//! Checks a Gemini API key: lists the models it can see and probes candidate
//! models with a test prompt until one answers.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod models;
pub mod probe;
pub mod report;

#[cfg(test)]
mod test_support;

pub use genai_probe_types as types;

pub use client::{Client, ClientBuilder, HttpOptions};
pub use config::ProbeConfig;
pub use driver::{run, DiagnosticReport};
pub use error::{Error, Result};
