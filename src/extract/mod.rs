//! Regex extraction of detail-page IDs and cell resources from page HTML.
//!
//! Two fixed patterns drive the whole crawl: one pulls detail-page IDs out
//! of category listings, the other pulls the download endpoint, resource ID,
//! and percent-encoded display name out of detail pages. Patterns are
//! compiled once and shared.

use std::sync::LazyLock;

use regex::Regex;

/// Matches anchor links to entry detail pages in category listings.
#[allow(clippy::expect_used)]
static DETAIL_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/dict/detail/index/(\d+)").expect("detail-ID pattern is valid")
});

/// Matches scheme-relative links to the cell download endpoint in detail pages.
///
/// Capture groups: whole match = scheme-relative link, 1 = resource ID,
/// 2 = percent-encoded display name.
#[allow(clippy::expect_used)]
static RESOURCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"//[^/"\s]+/d/dict/download_cell\.php\?id=(\d+)&name=([^"&]+)"#)
        .expect("resource pattern is valid")
});

/// One downloadable cell dictionary discovered on a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellResource {
    /// Scheme-relative download link as captured from the markup.
    pub link: String,
    /// Numeric resource ID from the download endpoint.
    pub id: u64,
    /// Display name, URL-decoded.
    pub name: String,
}

/// Extracts all detail-page IDs from category-listing HTML.
///
/// Every match is returned in document order; an empty result means the
/// page has no entries (the paginator's stop condition), never an error.
#[must_use]
pub fn extract_detail_ids(html: &str) -> Vec<u64> {
    DETAIL_ID_PATTERN
        .captures_iter(html)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Extracts all cell resources from detail-page HTML.
///
/// Display names appear percent-encoded in the markup and are decoded here;
/// a name that fails to decode is kept raw rather than dropped.
#[must_use]
pub fn extract_cell_resources(html: &str) -> Vec<CellResource> {
    RESOURCE_PATTERN
        .captures_iter(html)
        .filter_map(|caps| {
            let link = caps.get(0)?.as_str().to_string();
            let id = caps.get(1)?.as_str().parse().ok()?;
            let raw_name = caps.get(2)?.as_str();
            let name = urlencoding::decode(raw_name)
                .map_or_else(|_| raw_name.to_string(), std::borrow::Cow::into_owned);
            Some(CellResource { link, id, name })
        })
        .collect()
}
