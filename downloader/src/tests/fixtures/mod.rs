use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::fetch::Fetch;

/// Load an HTML fixture by name
pub fn load_html_fixture(fixture_name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src/tests/fixtures")
        .join(format!("{}.html", fixture_name));
    fs::read(path).unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name))
}

/// Serves canned responses by URL and records every request in order
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetch for FakeFetcher {
    fn open(&self, url: &str) -> Result<Box<dyn Read>> {
        self.requests.borrow_mut().push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(Error::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

/// Reader whose every read fails, standing in for a dropped connection
pub struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
    }
}
