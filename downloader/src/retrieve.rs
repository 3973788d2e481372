use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::fetch::Fetch;

/// Download `url` into `target_dir/filename`, replacing any existing file.
///
/// The body is streamed to disk. A failure part-way through leaves the
/// partial file in place.
pub fn retrieve<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
    filename: &str,
    target_dir: &Path,
) -> Result<PathBuf> {
    let mut body = fetcher.open(url)?;

    fs::create_dir_all(target_dir).map_err(|source| Error::Write {
        path: target_dir.to_path_buf(),
        source,
    })?;

    let path = target_dir.join(filename);
    let mut file = File::create(&path).map_err(|source| Error::Write {
        path: path.clone(),
        source,
    })?;

    let bytes = io::copy(&mut body, &mut file).map_err(|source| Error::Save {
        url: url.to_string(),
        path: path.clone(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", bytes, path.display());

    Ok(path)
}
