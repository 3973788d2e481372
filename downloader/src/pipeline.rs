use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use regex::Regex;

use crate::archive::{read_index, ArchiveEntry, PageStart};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{join_url, Fetch};
use crate::page::locate_image;
use crate::pattern;
use crate::retrieve::retrieve;

/// Output filename for a page link: `ap200115.html` becomes `image_200115.jpg`.
///
/// Returns `None` when the link is too short to hold the date.
pub fn derive_filename(link: &str) -> Option<String> {
    link.get(2..8).map(|date| format!("image_{}.jpg", date))
}

/// What happened to a single archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved(PathBuf),
    NoImage,
    BadLink,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub saved: usize,
    pub without_image: usize,
    pub bad_links: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} images saved, {} without an image, {} skipped for an unusable link",
            self.entries, self.saved, self.without_image, self.bad_links
        )
    }
}

/// Walks archive entries one at a time, saving the image found on each page
pub struct Director<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
    image_pattern: Regex,
    base_url: String,
    target_dir: PathBuf,
}

impl<'a, F: Fetch + ?Sized> Director<'a, F> {
    pub fn new(
        fetcher: &'a F,
        image_pattern: Regex,
        base_url: impl Into<String>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Director {
            fetcher,
            image_pattern,
            base_url: base_url.into(),
            target_dir: target_dir.into(),
        }
    }

    /// Process entries in order. The first error ends the run.
    pub fn run<I>(&self, entries: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<ArchiveEntry>>,
    {
        let mut summary = RunSummary::default();
        for entry in entries {
            let entry = entry?;
            summary.entries += 1;
            match self.process(&entry)? {
                Outcome::Saved(_) => summary.saved += 1,
                Outcome::NoImage => summary.without_image += 1,
                Outcome::BadLink => summary.bad_links += 1,
            }
        }
        Ok(summary)
    }

    pub fn process(&self, entry: &ArchiveEntry) -> Result<Outcome> {
        info!("Got link to page for {}: {}", entry.date_code, entry.title);

        let page_url = join_url(&self.base_url, &entry.link);
        // Pages without an image (videos, interactive pages) are skipped quietly
        let Some(image) = locate_image(self.fetcher, &page_url, &self.image_pattern)? else {
            return Ok(Outcome::NoImage);
        };
        info!("Image found at {}", image);

        let Some(filename) = derive_filename(&entry.link) else {
            warn!("Cannot derive a filename from link {:?}, skipping", entry.link);
            return Ok(Outcome::BadLink);
        };

        let image_url = join_url(&self.base_url, image.as_str());
        let path = retrieve(self.fetcher, &image_url, &filename, &self.target_dir)?;
        Ok(Outcome::Saved(path))
    }
}

/// Read the archive index named by `config` and save every qualifying image.
///
/// Patterns and the start date are validated before any request is made.
pub fn download_archive<F: Fetch + ?Sized>(config: &Config, fetcher: &F) -> Result<RunSummary> {
    let index_pattern = pattern::compile(&config.index_pattern, 3)?;
    let image_pattern = pattern::compile_ignore_case(&config.image_pattern, 1)?;
    let page_start = PageStart::from_start_date(&config.start_date, &config.link_prefix)?;

    info!(
        "Reading archive {} from {} onwards",
        config.archive_url, config.start_date
    );
    let entries = read_index(fetcher, &config.archive_url, &index_pattern, page_start)?;

    let director = Director::new(
        fetcher,
        image_pattern,
        config.base_url(),
        config.output_dir.clone(),
    );
    director.run(entries)
}
