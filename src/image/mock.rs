use super::ImageLookupService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockImageLookup {
    url: Option<String>,
    keywords: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockImageLookup {
    pub fn new() -> Self {
        Self {
            url: Some("https://images.example.com/photo.jpg".to_string()),
            keywords: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    /// Every lookup fails.
    pub fn failing(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.keywords.lock().unwrap().len()
    }

    pub fn get_keywords(&self) -> Vec<String> {
        self.keywords.lock().unwrap().clone()
    }
}

impl Default for MockImageLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageLookupService for MockImageLookup {
    async fn find_image(&self, keyword: &str) -> Result<String> {
        self.keywords.lock().unwrap().push(keyword.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.url
            .clone()
            .ok_or_else(|| Error::ImageLookup("mock lookup unavailable".to_string()))
    }
}
