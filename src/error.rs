//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use std::fmt;
use thiserror::Error;

/// Coarse classification of a text-generation provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Credential missing, invalid or lacking permission.
    Auth,
    /// Account quota exhausted.
    Quota,
    /// Too many requests in a short window.
    RateLimited,
    Other,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderErrorKind::Auth => "auth",
            ProviderErrorKind::Quota => "quota",
            ProviderErrorKind::RateLimited => "rate-limit",
            ProviderErrorKind::Other => "provider",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider {kind} error: {message}")]
    AiProvider {
        kind: ProviderErrorKind,
        message: String,
    },

    #[error("Image lookup error: {0}")]
    ImageLookup(String),

    #[error("Generated quote is empty")]
    EmptyQuote,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Error::AiProvider {
            kind,
            message: message.into(),
        }
    }

    /// Provider classification of this error; anything that did not come
    /// back from the provider as a recognised failure is `Other`.
    pub fn provider_kind(&self) -> ProviderErrorKind {
        match self {
            Error::AiProvider { kind, .. } => *kind,
            _ => ProviderErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures seen by the quote client. The display text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Request timeout — please try again")]
    Timeout,

    #[error("Cannot connect to server. Make sure the server is running on port {port}.")]
    Connect { port: u16 },

    /// Message reported by the server, or a status fallback.
    #[error("{0}")]
    Server(String),

    #[error("No quote received from server")]
    MissingQuote,

    #[error("Could not generate quote. Please try again.")]
    Request,

    /// The caller abandoned the request before it settled.
    #[error("Request cancelled — please try again")]
    Cancelled,
}
