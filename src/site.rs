//! Endpoint construction for the Sogou Pinyin dictionary site.
//!
//! This module centralizes how category-listing, detail-page, and resource
//! URLs are built so the crawler never concatenates paths ad hoc, and so
//! tests can point the whole pipeline at a mock server.

use url::Url;

/// Number of entries the site renders on a full listing page.
///
/// A page with fewer matches is the last page of its category.
pub const FULL_PAGE_SIZE: usize = 10;

/// Default maximum number of listing pages examined per category.
pub const DEFAULT_PAGE_CAP: u32 = 100;

/// Production site root.
pub const DEFAULT_BASE_URL: &str = "https://pinyin.sogou.com";

/// URL builder for one dictionary site instance.
///
/// Holds the base URL and derives the scheme used to complete the
/// scheme-relative resource links captured from detail-page markup.
#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
}

impl Site {
    /// Creates a site rooted at `base` (e.g. a mock server URI in tests).
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if `base` is not a valid absolute URL.
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        Url::parse(base).map(|base| Self { base })
    }

    /// Creates the production Sogou Pinyin site.
    ///
    /// # Panics
    ///
    /// Panics if the static base URL fails to parse. This should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn sogou() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("static base URL is valid")
    }

    /// Returns the base URL without a trailing slash.
    fn base_str(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Category-listing URL for `category_id`, page `page`.
    #[must_use]
    pub fn category_page_url(&self, category_id: u64, page: u32) -> String {
        format!(
            "{}/dict/cate/index/{category_id}/default/{page}",
            self.base_str()
        )
    }

    /// Detail-page URL for one dictionary entry.
    #[must_use]
    pub fn detail_url(&self, detail_id: u64) -> String {
        format!("{}/dict/detail/index/{detail_id}", self.base_str())
    }

    /// Completes a resource link captured from detail-page markup.
    ///
    /// Links appear scheme-relative in the source (`//host/path?...`); they
    /// are prefixed with this site's scheme. Already-absolute links pass
    /// through unchanged.
    #[must_use]
    pub fn resource_url(&self, link: &str) -> String {
        if link.starts_with("//") {
            format!("{}:{link}", self.base.scheme())
        } else {
            link.to_string()
        }
    }
}
