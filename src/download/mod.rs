//! Streaming resource downloads and the existence gate.

mod client;
mod error;
mod filename;

pub use client::{DownloadOutcome, FileDownloader};
pub use error::DownloadError;
pub use filename::{CELL_EXTENSION, cell_file_path, sanitize_display_name};
