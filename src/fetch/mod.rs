//! HTML fetching for category-listing and detail pages.

mod client;
mod error;

pub use client::HtmlFetcher;
pub use error::FetchError;
