//! Data models and structures
//!
//! Defines quote categories, the JSON payloads exchanged between the relay
//! and its clients, and process configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const SERVICE_NAME: &str = "Motivational Quotes Generator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Success,
    Courage,
    Happiness,
    Wisdom,
    Perseverance,
    Hope,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Success,
        Category::Courage,
        Category::Happiness,
        Category::Wisdom,
        Category::Perseverance,
        Category::Hope,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Success => "success",
            Category::Courage => "courage",
            Category::Happiness => "happiness",
            Category::Wisdom => "wisdom",
            Category::Perseverance => "perseverance",
            Category::Hope => "hope",
        }
    }

    /// Normalize user input. Missing or unrecognised values become `General`.
    pub fn from_input(input: Option<&str>) -> Self {
        input
            .and_then(|value| Self::ALL.into_iter().find(|c| c.as_str() == value))
            .unwrap_or_default()
    }

    /// Search keyword used when looking up a background image.
    pub fn image_keyword(&self) -> &'static str {
        match self {
            Category::General => "motivation landscape",
            Category::Success => "mountain summit",
            Category::Courage => "adventure cliff",
            Category::Happiness => "sunshine meadow",
            Category::Wisdom => "library books",
            Category::Perseverance => "marathon road",
            Category::Hope => "sunrise horizon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /generate` and `POST /generate-with-image`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl GenerateRequest {
    pub fn category(&self) -> Category {
        Category::from_input(self.category.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteResponse {
    pub quote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IllustratedQuoteResponse {
    pub quote: String,
    pub image_url: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

/// Lenient view of any relay response, as read by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEnvelope {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Whether raw upstream error text may be returned to clients.
    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub unsplash_access_key: Option<String>,
    pub port: u16,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = non_blank("GEMINI_API_KEY").ok_or_else(|| {
            crate::Error::Config(
                "GEMINI_API_KEY is not set. Create a .env file with: GEMINI_API_KEY=your_api_key"
                    .to_string(),
            )
        })?;

        let port = match non_blank("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid PORT value '{}'", raw)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: non_blank("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            unsplash_access_key: non_blank("UNSPLASH_ACCESS_KEY"),
            port,
            environment: Environment::parse(lookup("APP_ENV").as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_category_from_known_input() {
        for category in Category::ALL {
            assert_eq!(Category::from_input(Some(category.as_str())), category);
        }
    }

    #[test]
    fn test_unknown_category_collapses_to_general() {
        assert_eq!(Category::from_input(Some("unknown-xyz")), Category::General);
        assert_eq!(Category::from_input(Some("")), Category::General);
        assert_eq!(Category::from_input(Some("Courage")), Category::General);
        assert_eq!(Category::from_input(None), Category::General);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Perseverance).unwrap();
        assert_eq!(json, "\"perseverance\"");
    }

    #[test]
    fn test_illustrated_response_uses_camel_case() {
        let response = IllustratedQuoteResponse {
            quote: "Keep going".to_string(),
            image_url: "https://img.example/1.jpg".to_string(),
            category: Category::Hope,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["imageUrl"], "https://img.example/1.jpg");
        assert_eq!(json["category"], "hope");
    }

    #[test]
    fn test_error_response_omits_missing_details() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "Failed to generate quote".to_string(),
            details: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"Failed to generate quote"}"#);
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "key")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.unsplash_access_key.is_none());
        assert_eq!(config.environment, Environment::Development);
        assert!(config.environment.exposes_error_details());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("PORT", "8080"),
            ("UNSPLASH_ACCESS_KEY", "unsplash"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.unsplash_access_key.as_deref(), Some("unsplash"));
        assert!(!config.environment.exposes_error_details());
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "key"), ("PORT", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
