//! Quote client
//!
//! A UI-agnostic controller for the relay. All presentation state lives in one
//! [`ClientState`] owned by the [`QuoteController`]; front-ends render the
//! [`View`] derived from it.

pub mod actions;
pub mod controller;
pub mod export;
pub mod state;
pub mod theme;

pub use actions::{Clipboard, Speaker};
pub use controller::{QuoteController, Trigger, DEFAULT_TIMEOUT};
pub use state::{render, ClientState, DisplayedQuote, ImageView, UiState, View};
pub use theme::Gradient;
