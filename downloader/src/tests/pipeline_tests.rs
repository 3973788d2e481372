use std::fs;

use super::fixtures::{load_html_fixture, FakeFetcher};
use crate::archive::ArchiveEntry;
use crate::config::{Config, DEFAULT_IMAGE_PATTERN};
use crate::error::Error;
use crate::pattern::compile_ignore_case;
use crate::pipeline::{derive_filename, download_archive, Director, Outcome, RunSummary};

const BASE: &str = "https://apod.example/apod";
const INDEX_URL: &str = "https://apod.example/apod/archivepix.html";

fn entry(link: &str, title: &str) -> ArchiveEntry {
    ArchiveEntry {
        date_code: format!("20{}", &link[2..8]),
        link: link.to_string(),
        title: title.to_string(),
    }
}

fn archive_fetcher() -> FakeFetcher {
    FakeFetcher::new()
        .with_page(INDEX_URL, load_html_fixture("archivepix"))
        .with_page(
            &format!("{}/ap200117.html", BASE),
            "<p>\n<img src=\"image/2001/Pelican.jpg\"\n</p>\n",
        )
        .with_page(&format!("{}/ap200116.html", BASE), load_html_fixture("ap200116"))
        .with_page(&format!("{}/ap200115.html", BASE), load_html_fixture("ap200115"))
        .with_page(&format!("{}/image/2001/Pelican.jpg", BASE), b"pelican".to_vec())
        .with_page(
            &format!("{}/image/2001/OrionGas_1024.jpg", BASE),
            b"orion".to_vec(),
        )
}

#[test]
fn test_derive_filename_uses_date_from_link() {
    assert_eq!(
        derive_filename("ap200115.html"),
        Some("image_200115.jpg".to_string())
    );
    assert_eq!(derive_filename("ap991231.html"), Some("image_991231.jpg".to_string()));
}

#[test]
fn test_derive_filename_rejects_short_links() {
    assert_eq!(derive_filename("ap2001"), None);
    assert_eq!(derive_filename(""), None);
}

#[test]
fn test_process_saves_image_from_page() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = archive_fetcher();
    let pattern = compile_ignore_case(DEFAULT_IMAGE_PATTERN, 1).unwrap();
    let director = Director::new(&fetcher, pattern, BASE, dir.path());

    let outcome = director.process(&entry("ap200115.html", "Orion in Gas")).unwrap();

    let expected = dir.path().join("image_200115.jpg");
    assert_eq!(outcome, Outcome::Saved(expected.clone()));
    assert_eq!(fs::read(expected).unwrap(), b"orion");
    assert_eq!(
        fetcher.requests(),
        vec![
            format!("{}/ap200115.html", BASE),
            format!("{}/image/2001/OrionGas_1024.jpg", BASE),
        ]
    );
}

#[test]
fn test_page_without_image_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = archive_fetcher();
    let pattern = compile_ignore_case(DEFAULT_IMAGE_PATTERN, 1).unwrap();
    let director = Director::new(&fetcher, pattern, BASE, dir.path());

    let outcome = director
        .process(&entry("ap200116.html", "Betelgeuse Dimming"))
        .unwrap();

    assert_eq!(outcome, Outcome::NoImage);
    assert_eq!(fetcher.requests(), vec![format!("{}/ap200116.html", BASE)]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_run_stops_at_first_error() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = archive_fetcher();
    let pattern = compile_ignore_case(DEFAULT_IMAGE_PATTERN, 1).unwrap();
    let director = Director::new(&fetcher, pattern, BASE, dir.path());

    let entries = vec![
        Ok(entry("ap200117.html", "Pelican Nebula")),
        Ok(entry("ap200118.html", "Missing page")),
        Ok(entry("ap200115.html", "Orion in Gas")),
    ];
    let result = director.run(entries);

    assert!(matches!(result, Err(Error::Status { .. })));
    assert!(dir.path().join("image_200117.jpg").exists());
    assert!(!dir.path().join("image_200115.jpg").exists());
}

#[test]
fn test_download_archive_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = archive_fetcher();
    let config = Config {
        archive_url: INDEX_URL.to_string(),
        start_date: "2020-01-15".to_string(),
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    let summary = download_archive(&config, &fetcher).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            entries: 3,
            saved: 2,
            without_image: 1,
            bad_links: 0,
        }
    );
    assert_eq!(fs::read(dir.path().join("image_200117.jpg")).unwrap(), b"pelican");
    assert_eq!(fs::read(dir.path().join("image_200115.jpg")).unwrap(), b"orion");
    assert!(!dir.path().join("image_200116.jpg").exists());

    // Each page is finished before the next one is requested
    assert_eq!(
        fetcher.requests(),
        vec![
            INDEX_URL.to_string(),
            format!("{}/ap200117.html", BASE),
            format!("{}/image/2001/Pelican.jpg", BASE),
            format!("{}/ap200116.html", BASE),
            format!("{}/ap200115.html", BASE),
            format!("{}/image/2001/OrionGas_1024.jpg", BASE),
        ]
    );
}

#[test]
fn test_invalid_config_fails_before_any_request() {
    let fetcher = archive_fetcher();
    let config = Config {
        archive_url: INDEX_URL.to_string(),
        start_date: "15/01/2020".to_string(),
        ..Config::default()
    };

    let result = download_archive(&config, &fetcher);

    assert!(matches!(result, Err(Error::StartDate(_))));
    assert!(fetcher.requests().is_empty());
}

#[test]
fn test_custom_image_pattern_matches_uppercase_tags() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = archive_fetcher();
    let config = Config {
        archive_url: INDEX_URL.to_string(),
        start_date: "2020-01-15".to_string(),
        image_pattern: r#"^<img src="(image/[^"]+)""#.to_string(),
        output_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    let summary = download_archive(&config, &fetcher).unwrap();

    assert_eq!(summary.saved, 2);
    assert_eq!(fs::read(dir.path().join("image_200115.jpg")).unwrap(), b"orion");
}

#[test]
fn test_run_summary_reports_every_count() {
    let summary = RunSummary {
        entries: 5,
        saved: 3,
        without_image: 1,
        bad_links: 1,
    };

    assert_eq!(
        summary.to_string(),
        "5 pages, 3 images saved, 1 without an image, 1 skipped for an unusable link"
    );
}
