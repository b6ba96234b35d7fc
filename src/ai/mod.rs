//! AI service integration for quote generation
//!
//! The relay treats the language model as an opaque text generator: one prompt
//! in, one block of text out. Gemini is the production backend.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiQuoteClient;
pub use mock::MockQuoteGenerator;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait QuoteGenerator: Send + Sync {
    /// Generate raw text for `prompt`. Callers own trimming and emptiness checks.
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}
