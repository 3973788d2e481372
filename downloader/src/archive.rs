use std::io::{BufRead, BufReader, Read};
use std::iter::FusedIterator;

use chrono::NaiveDate;
use log::trace;
use regex::Regex;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::pattern::{decode_line, match_line};

/// One row of the archive index that falls on or after the start date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Date label as written in the index, e.g. `2020 January 15`
    pub date_code: String,
    /// Page path relative to the archive's parent URL, e.g. `ap200115.html`
    pub link: String,
    pub title: String,
}

/// Lower bound for index links, derived from the configured start date.
///
/// Links are fixed-width and zero-padded, so comparing them as strings
/// orders them by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStart {
    token: String,
    key: String,
}

impl PageStart {
    pub fn from_start_date(start_date: &str, link_prefix: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
            .map_err(|_| Error::StartDate(start_date.to_string()))?;
        let token = date.format("%y%m%d").to_string();
        let key = format!("{}{}", link_prefix, token);
        Ok(PageStart { token, key })
    }

    /// Six-digit `YYMMDD` form of the start date
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The value links are compared against: link prefix followed by the token
    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn admits(&self, link: &str) -> bool {
        link >= self.key.as_str()
    }
}

/// Lazy, forward-only sequence of archive entries read from an index document.
///
/// Lines are read and matched only as entries are requested. A read error is
/// yielded once, after which the sequence is exhausted.
pub struct ArchiveEntries<R> {
    reader: R,
    source: String,
    pattern: Regex,
    page_start: PageStart,
    line: Vec<u8>,
    done: bool,
}

impl<R: BufRead> ArchiveEntries<R> {
    pub fn new(reader: R, source: impl Into<String>, pattern: Regex, page_start: PageStart) -> Self {
        ArchiveEntries {
            reader,
            source: source.into(),
            pattern,
            page_start,
            line: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ArchiveEntries<R> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let line = decode_line(&self.line);
                    trace!("{}", line);

                    let Some([date_code, link, title]) = match_line::<3>(&line, &self.pattern) else {
                        continue;
                    };
                    if self.page_start.admits(&link) {
                        return Some(Ok(ArchiveEntry {
                            date_code,
                            link,
                            title,
                        }));
                    }
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(Error::Read {
                        url: self.source.clone(),
                        source,
                    }));
                }
            }
        }
        None
    }
}

impl<R: BufRead> FusedIterator for ArchiveEntries<R> {}

/// Open the archive index at `url` and return its qualifying entries lazily
pub fn read_index<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
    pattern: &Regex,
    page_start: PageStart,
) -> Result<ArchiveEntries<BufReader<Box<dyn Read>>>> {
    let body = fetcher.open(url)?;
    Ok(ArchiveEntries::new(
        BufReader::new(body),
        url,
        pattern.clone(),
        page_start,
    ))
}
