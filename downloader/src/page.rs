use std::fmt;
use std::io::{BufRead, BufReader};

use regex::Regex;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::pattern::{decode_line, match_line};

/// Image path found on a page, relative to the archive's parent URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(pub String);

impl ImageReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fetch a page and return the image reference on its last matching line
pub fn locate_image<F: Fetch + ?Sized>(
    fetcher: &F,
    page_url: &str,
    pattern: &Regex,
) -> Result<Option<ImageReference>> {
    let body = fetcher.open(page_url)?;
    last_image_reference(BufReader::new(body), page_url, pattern)
}

/// Scan every line of `reader`, keeping the most recent match.
///
/// Pages list the thumbnail before the full image, so the last match is the
/// one to download.
pub fn last_image_reference<R: BufRead>(
    mut reader: R,
    url: &str,
    pattern: &Regex,
) -> Result<Option<ImageReference>> {
    let mut found = None;
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| Error::Read {
                url: url.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }

        if let Some([path]) = match_line::<1>(&decode_line(&line), pattern) {
            found = Some(ImageReference(path));
        }
    }
    Ok(found)
}
