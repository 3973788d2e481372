use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fetch::{parent_url, TransportConfig};

pub const DEFAULT_ARCHIVE_URL: &str = "https://apod.nasa.gov/apod/archivepix.html";

/// Index rows look like `2020 January 15:  <a href="ap200115.html">Title</a><br>`.
/// Groups: date label, relative link, title.
pub const DEFAULT_INDEX_PATTERN: &str = r#"^(\d{4}[^:]+):\s+<a href="([^"]+)[^>]+>([^<]+)</a>.*$"#;

/// Groups: image path. Always matched without regard to case.
pub const DEFAULT_IMAGE_PATTERN: &str = r#"^<img src="([^"]+)"$"#;

pub const DEFAULT_START_DATE: &str = "2020-01-01";

/// Prefix of every page link in the archive index
pub const DEFAULT_LINK_PREFIX: &str = "ap";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL of the archive index page; page and image links are resolved
    /// against its parent
    pub archive_url: String,
    pub index_pattern: String,
    pub image_pattern: String,
    /// Oldest day to download, `YYYY-MM-DD`
    pub start_date: String,
    pub link_prefix: String,
    pub output_dir: PathBuf,
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
    /// `User-Agent` header sent with every request; reqwest sends none by default
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            index_pattern: DEFAULT_INDEX_PATTERN.to_string(),
            image_pattern: DEFAULT_IMAGE_PATTERN.to_string(),
            start_date: DEFAULT_START_DATE.to_string(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            accept_invalid_certs: TransportConfig::default().accept_invalid_certs,
            user_agent: None,
        }
    }
}

impl Config {
    /// Load a JSON config file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            accept_invalid_certs: self.accept_invalid_certs,
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        parent_url(&self.archive_url)
    }
}
