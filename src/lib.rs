//! Motivational quote relay
//!
//! Serves quotes generated on demand by an LLM provider, optionally paired
//! with a themed background image, and ships a client controller that drives
//! the relay from any front-end.

pub mod ai;
pub mod app;
pub mod client;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{ClientError, Error, Result};
