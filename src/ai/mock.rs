use super::QuoteGenerator;
use crate::error::ProviderErrorKind;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(ProviderErrorKind, String),
}

#[derive(Clone)]
pub struct MockQuoteGenerator {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockQuoteGenerator {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    pub fn with_text_response(self, response: String) -> Self {
        self.replies.lock().unwrap().push(MockReply::Text(response));
        self
    }

    pub fn with_failure(self, kind: ProviderErrorKind, message: String) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(kind, message));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockQuoteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteGenerator for MockQuoteGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let reply = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            self.prompts.lock().unwrap().push(prompt.to_string());

            let replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                None
            } else {
                Some(replies[(*count - 1) % replies.len()].clone())
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            None => Ok("The best way out is always through. — Robert Frost".to_string()),
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Failure(kind, message)) => Err(Error::provider(kind, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let generator = MockQuoteGenerator::new();
        let text = generator.generate_text("anything").await.unwrap();
        assert!(text.contains("Robert Frost"));
    }

    #[tokio::test]
    async fn test_mock_cycles_responses() {
        let generator = MockQuoteGenerator::new()
            .with_text_response("First".to_string())
            .with_failure(ProviderErrorKind::RateLimited, "429".to_string());

        assert_eq!(generator.generate_text("a").await.unwrap(), "First");
        let err = generator.generate_text("b").await.unwrap_err();
        assert_eq!(err.provider_kind(), ProviderErrorKind::RateLimited);
        assert_eq!(generator.generate_text("c").await.unwrap(), "First");

        assert_eq!(generator.get_call_count(), 3);
        assert_eq!(generator.get_prompts(), vec!["a", "b", "c"]);
    }
}
