pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod page;
pub mod pattern;
pub mod pipeline;
pub mod retrieve;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::archive::{read_index, ArchiveEntries, ArchiveEntry, PageStart};
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::fetch::{join_url, parent_url, Fetch, HttpFetcher, TransportConfig};
pub use crate::page::{locate_image, ImageReference};
pub use crate::pipeline::{derive_filename, download_archive, Director, Outcome, RunSummary};
pub use crate::retrieve::retrieve;
