//! Wire types for the genai-probe Gemini API diagnostics.

pub mod content;
pub mod models;
pub mod response;
