//! Per-category crawl pipeline: pagination, detail resolution, downloads.
//!
//! [`Crawler::crawl_category`] drives one category to completion: it walks
//! listing pages up to the page cap, resolves every discovered detail page
//! to its cell resources, and hands each resource to the existence-gated
//! downloader. Two heuristics terminate pagination early: a page with zero
//! matches means the category is exhausted, and a page with fewer than
//! [`FULL_PAGE_SIZE`] matches is the last page.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::download::{DownloadError, DownloadOutcome, FileDownloader, cell_file_path};
use crate::extract::{extract_cell_resources, extract_detail_ids};
use crate::fetch::{FetchError, HtmlFetcher};
use crate::site::{FULL_PAGE_SIZE, Site};

/// Errors that abort one category's processing.
///
/// Zero regex matches is never an error; it is a terminal result handled
/// by the pagination and resolution stop rules.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A listing or detail page fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A resource download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The download directory could not be created.
    #[error("failed to create download directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Per-category counters returned to the caller after a crawl.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    /// Listing pages fetched before a stop rule fired.
    pub pages_fetched: u32,
    /// Detail-page links seen across all fetched pages.
    pub entries_seen: usize,
    /// Resources downloaded to disk.
    pub downloaded: usize,
    /// Resources skipped because the destination already existed.
    pub skipped: usize,
}

/// Crawls one category at a time: paginate, resolve, download.
///
/// Cheap to clone behind an [`std::sync::Arc`]; the worker pool shares one
/// instance across all workers.
#[derive(Debug)]
pub struct Crawler {
    site: Site,
    fetcher: HtmlFetcher,
    downloader: FileDownloader,
    download_dir: PathBuf,
    page_cap: u32,
}

impl Crawler {
    /// Creates a crawler writing into `download_dir`, examining at most
    /// `page_cap` listing pages per category.
    #[must_use]
    pub fn new(
        site: Site,
        fetcher: HtmlFetcher,
        downloader: FileDownloader,
        download_dir: PathBuf,
        page_cap: u32,
    ) -> Self {
        Self {
            site,
            fetcher,
            downloader,
            download_dir,
            page_cap,
        }
    }

    /// Crawls one category to completion.
    ///
    /// Ensures the download directory exists, then iterates listing pages
    /// from 1 to the page cap. Per page: extract detail IDs, stop if the
    /// page is empty, otherwise resolve and download every entry, then stop
    /// if the page was short.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError`] on the first fetch, download, or filesystem
    /// failure. There is no retry and no isolation between pages: the
    /// category's remaining pages are abandoned.
    #[instrument(skip(self))]
    pub async fn crawl_category(&self, category_id: u64) -> Result<CategoryStats, CrawlError> {
        self.ensure_download_dir().await?;

        let mut stats = CategoryStats::default();
        for page in 1..=self.page_cap {
            let url = self.site.category_page_url(category_id, page);
            let html = self.fetcher.fetch_html(&url).await?;
            let detail_ids = extract_detail_ids(&html);
            stats.pages_fetched += 1;
            debug!(category_id, page, entries = detail_ids.len(), "fetched listing page");

            // An empty page means the category is exhausted.
            if detail_ids.is_empty() {
                break;
            }

            stats.entries_seen += detail_ids.len();
            let last_page = detail_ids.len() < FULL_PAGE_SIZE;

            for detail_id in detail_ids {
                self.resolve_and_download(detail_id, &mut stats).await?;
            }

            // A short page is the last page: the site renders exactly
            // FULL_PAGE_SIZE entries per full page.
            if last_page {
                break;
            }
        }

        info!(
            category_id,
            pages = stats.pages_fetched,
            entries = stats.entries_seen,
            downloaded = stats.downloaded,
            skipped = stats.skipped,
            "category complete"
        );
        Ok(stats)
    }

    /// Resolves one detail page and downloads its cell resources.
    ///
    /// A detail page with no resource match is a page format with no
    /// resource, not a failure: it yields zero downloads and resolution
    /// continues with the next detail ID.
    async fn resolve_and_download(
        &self,
        detail_id: u64,
        stats: &mut CategoryStats,
    ) -> Result<(), CrawlError> {
        let html = self.fetcher.fetch_html(&self.site.detail_url(detail_id)).await?;
        let resources = extract_cell_resources(&html);
        if resources.is_empty() {
            debug!(detail_id, "detail page has no downloadable resource");
            return Ok(());
        }

        for resource in resources {
            let url = self.site.resource_url(&resource.link);
            let path = cell_file_path(&self.download_dir, &resource.name);
            match self.downloader.download_if_absent(&url, &path).await? {
                DownloadOutcome::Downloaded(bytes) => {
                    info!(detail_id, path = %path.display(), bytes, "downloaded cell");
                    stats.downloaded += 1;
                }
                DownloadOutcome::Skipped => {
                    debug!(detail_id, path = %path.display(), "cell already on disk");
                    stats.skipped += 1;
                }
            }
        }
        Ok(())
    }

    /// Creates the download directory if absent.
    ///
    /// Creation is non-recursive: the parent must already exist.
    async fn ensure_download_dir(&self) -> Result<(), CrawlError> {
        match tokio::fs::create_dir(&self.download_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(CrawlError::CreateDir {
                path: self.download_dir.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_crawler(base: &str, dir: PathBuf) -> Crawler {
        Crawler::new(
            Site::new(base).unwrap(),
            HtmlFetcher::new(),
            FileDownloader::new(),
            dir,
            100,
        )
    }

    #[tokio::test]
    async fn test_ensure_download_dir_creates_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("cell");
        let crawler = test_crawler("http://127.0.0.1:1", dir.clone());

        crawler.ensure_download_dir().await.unwrap();
        assert!(dir.is_dir());

        // Idempotent: a second call on the existing dir succeeds.
        crawler.ensure_download_dir().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_download_dir_is_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("missing-parent").join("cell");
        let crawler = test_crawler("http://127.0.0.1:1", dir);

        let result = crawler.ensure_download_dir().await;
        assert!(
            matches!(result, Err(CrawlError::CreateDir { .. })),
            "creation must fail when the parent is missing: {result:?}"
        );
    }
}
