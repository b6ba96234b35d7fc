//! Background image lookup
//!
//! Resolves a category keyword to a photo URL. Lookups may fail; callers fall
//! back to [`PlaceholderImages`], which always produces a URL but has no
//! relation to the category.

pub mod mock;
pub mod placeholder;
pub mod unsplash;

pub use mock::MockImageLookup;
pub use placeholder::PlaceholderImages;
pub use unsplash::UnsplashClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageLookupService: Send + Sync {
    async fn find_image(&self, keyword: &str) -> Result<String>;
}
