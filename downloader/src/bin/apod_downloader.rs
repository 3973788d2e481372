use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use apod_downloader::{download_archive, Config, HttpFetcher};
use clap::Parser;
use log::{error, info, warn};

/// Download Astronomy Picture of the Day images from the APOD archive
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL of the archive index page
    #[arg(long)]
    archive_url: Option<String>,

    /// Oldest day to download (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Directory images are saved to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// User-Agent header to send with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Validate TLS certificates (validation is off by default)
    #[arg(long)]
    verify_tls: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(archive_url) = self.archive_url {
            config.archive_url = archive_url;
        }
        if let Some(start_date) = self.start_date {
            config.start_date = start_date;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = Some(user_agent);
        }
        if self.verify_tls {
            config.accept_invalid_certs = false;
        }

        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;

    if config.accept_invalid_certs {
        warn!("TLS certificate validation is disabled; pass --verify-tls to enable it");
    }

    let fetcher = HttpFetcher::new(&config.transport())?;
    let summary = download_archive(&config, &fetcher)?;

    info!("Done: {} (output in {})", summary, config.output_dir.display());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("Interrupted by user.");
        process::exit(130);
    }) {
        warn!("Failed to install interrupt handler: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}
