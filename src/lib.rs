//! Celldict Core Library
//!
//! This library implements a crawler for the Sogou Pinyin dictionary site.
//! It walks paginated category listings, resolves each entry's detail page
//! to a downloadable `.scel` resource, and mirrors the resources into a
//! flat local directory, skipping files that are already present.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`site`] - Endpoint construction for listing and detail pages
//! - [`fetch`] - HTML fetching with bounded timeouts
//! - [`extract`] - Regex extraction of detail IDs and cell resources
//! - [`download`] - Streaming file downloads and the existence gate
//! - [`crawler`] - Per-category pagination/resolution/download pipeline
//! - [`pool`] - Worker pool, category-ID generation, cooperative shutdown

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crawler;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod pool;
pub mod site;

mod user_agent;

// Re-export commonly used types
pub use crawler::{CategoryStats, CrawlError, Crawler};
pub use download::{DownloadError, DownloadOutcome, FileDownloader};
pub use extract::{CellResource, extract_cell_resources, extract_detail_ids};
pub use fetch::{FetchError, HtmlFetcher};
pub use pool::{CrawlStats, IdRange, PoolError, ShutdownSignal, ShutdownTrigger, WorkerPool, shutdown_channel};
pub use site::{DEFAULT_PAGE_CAP, FULL_PAGE_SIZE, Site};
