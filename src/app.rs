//! Quote generation orchestration shared by the HTTP handlers.

use crate::ai::{GeminiQuoteClient, QuoteGenerator};
use crate::image::{ImageLookupService, PlaceholderImages, UnsplashClient};
use crate::models::{Category, Config};
use crate::{prompts, Error, Result};
use tracing::{error, info, warn};

/// A generated quote together with its background image.
#[derive(Debug, Clone, PartialEq)]
pub struct IllustratedQuote {
    pub quote: String,
    pub image_url: String,
    pub category: Category,
}

/// Coordinates the text generator and the image lookup for one request.
pub struct App {
    generator: Box<dyn QuoteGenerator>,
    images: Option<Box<dyn ImageLookupService>>,
    placeholder: PlaceholderImages,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub generator: Box<dyn QuoteGenerator>,
    /// `None` sends every image request straight to the placeholder source.
    pub images: Option<Box<dyn ImageLookupService>>,
    pub placeholder: PlaceholderImages,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            generator: services.generator,
            images: services.images,
            placeholder: services.placeholder,
        }
    }

    /// Construct the production services described by `config`.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let generator = GeminiQuoteClient::new_with_client(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            http_client.clone(),
        );
        info!("Quote provider: Gemini (model: {})", generator.model());

        let images = config.unsplash_access_key.clone().map(|key| {
            info!("Image provider: Unsplash");
            Box::new(UnsplashClient::new_with_client(key, http_client))
                as Box<dyn ImageLookupService>
        });
        if images.is_none() {
            info!("UNSPLASH_ACCESS_KEY not set; images come from the placeholder source");
        }

        Self::with_services(AppServices {
            generator: Box::new(generator),
            images,
            placeholder: PlaceholderImages::new(),
        })
    }

    /// Generate a trimmed, non-empty quote for `category`.
    pub async fn generate_quote(&self, category: Category) -> Result<String> {
        info!("Generating quote for category: {}", category);

        let raw = self
            .generator
            .generate_text(prompts::quote_prompt(category))
            .await
            .map_err(|e| {
                error!("Error generating quote for {}: {}", category, e);
                e
            })?;

        let quote = raw.trim();
        if quote.is_empty() {
            warn!("Provider returned an empty quote for {}", category);
            return Err(Error::EmptyQuote);
        }

        Ok(quote.to_string())
    }

    /// Generate a quote and look up its image concurrently. The result is
    /// only produced once both branches have settled.
    pub async fn generate_quote_with_image(&self, category: Category) -> Result<IllustratedQuote> {
        let (quote, image_url) =
            tokio::join!(self.generate_quote(category), self.lookup_image(category));

        Ok(IllustratedQuote {
            quote: quote?,
            image_url,
            category,
        })
    }

    async fn lookup_image(&self, category: Category) -> String {
        let Some(images) = &self.images else {
            return self.placeholder.url_now();
        };

        match images.find_image(category.image_keyword()).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    "Image lookup failed for {}: {}. Using placeholder image.",
                    category, e
                );
                self.placeholder.url_now()
            }
        }
    }
}
