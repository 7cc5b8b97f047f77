//! Profile generation powered by the Gemini API

pub mod client;
pub mod generator;

pub use client::GeminiClient;
pub use generator::{GeminiGenerator, GenerationError, JsonCompletion, Profile, ProfileSource};
