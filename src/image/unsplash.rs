use super::ImageLookupService;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

#[derive(Debug, Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
    full: Option<String>,
}

/// Unsplash random-photo lookup.
pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
    timeout: Duration,
}

impl UnsplashClient {
    pub fn new(access_key: String) -> Self {
        Self::new_with_client(access_key, Client::new())
    }

    pub fn new_with_client(access_key: String, client: Client) -> Self {
        Self {
            client,
            access_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ImageLookupService for UnsplashClient {
    async fn find_image(&self, keyword: &str) -> Result<String> {
        let url = format!("{}/photos/random", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[("query", keyword), ("orientation", "landscape")])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .send()
            .await
            .map_err(|e| Error::ImageLookup(format!("Failed to reach Unsplash: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::ImageLookup(format!(
                "Unsplash API error (status {}): {}",
                status, error_text
            )));
        }

        let photo: RandomPhoto = response
            .json()
            .await
            .map_err(|e| Error::ImageLookup(format!("Failed to parse Unsplash response: {}", e)))?;

        photo
            .urls
            .regular
            .or(photo.urls.full)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::ImageLookup("No image URL in Unsplash response".to_string()))
    }
}
