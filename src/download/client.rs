use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::config::Source;
use crate::ui::Ui;

/// What happened to one source file
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Already on disk; no request was made
    Skipped,
    Downloaded { bytes: u64 },
}

pub struct GeoNamesClient {
    client: Client,
}

impl GeoNamesClient {
    /// `timeout` bounds each whole request; `None` waits indefinitely
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("geonames-to-sqlite")
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Stream `url` into a newly created `dest`.
    ///
    /// Never overwrites: `dest` must not exist. If the transfer fails the
    /// partial file is removed so the next run downloads it again.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .with_context(|| format!("Failed to create destination file: {:?}", dest))?;

        let result = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to fetch {}", url))
            .and_then(|mut response| {
                io::copy(&mut response, &mut file)
                    .with_context(|| format!("Failed to write {:?}", dest))
            });

        if result.is_err() {
            drop(file);
            fs::remove_file(dest).ok();
        }

        result
    }

    /// Fetch every source missing from `dir`, concurrently.
    ///
    /// Returns once all transfers have finished; the first failure (in
    /// source order) is returned.
    pub fn fetch_all(
        &self,
        sources: &[&Source],
        dir: &Path,
        ui: &mut impl Ui,
    ) -> Result<Vec<FetchOutcome>> {
        let mut pending = Vec::new();
        for source in sources {
            let dest = dir.join(&source.file_name);
            if dest.exists() {
                ui.log(format!("Skipping {} file {}", source.url, source.file_name));
            } else {
                ui.log(format!("Downloading {} file {}", source.url, source.file_name));
                pending.push((*source, dest));
            }
        }

        let results: Vec<(&Source, Result<u64>)> = thread::scope(|scope| {
            let handles: Vec<_> = pending
                .iter()
                .map(|(source, dest)| {
                    let handle = scope.spawn(move || self.download(&source.url, dest));
                    (*source, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(source, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(anyhow::anyhow!("Download thread panicked")));
                    (source, result)
                })
                .collect()
        });

        let mut downloaded = Vec::new();
        for (source, result) in results {
            let bytes = result?;
            ui.log(format!(
                "  COMPLETED {} file {} ({})",
                source.url,
                source.file_name,
                format_bytes(bytes)
            ));
            downloaded.push((source.file_name.as_str(), bytes));
        }

        Ok(sources
            .iter()
            .map(|source| {
                downloaded
                    .iter()
                    .find(|(name, _)| *name == source.file_name)
                    .map(|&(_, bytes)| FetchOutcome::Downloaded { bytes })
                    .unwrap_or(FetchOutcome::Skipped)
            })
            .collect())
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
