use chrono::{DateTime, Utc};

const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Always-available image source keyed by time rather than subject.
#[derive(Debug, Clone)]
pub struct PlaceholderImages {
    base_url: String,
    width: u32,
    height: u32,
}

impl PlaceholderImages {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            width: 1600,
            height: 900,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn url_at(&self, at: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{}?random={}",
            self.base_url,
            self.width,
            self.height,
            at.timestamp_millis()
        )
    }

    pub fn url_now(&self) -> String {
        self.url_at(Utc::now())
    }
}

impl Default for PlaceholderImages {
    fn default() -> Self {
        Self::new()
    }
}
