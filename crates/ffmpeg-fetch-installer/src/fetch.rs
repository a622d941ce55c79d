use std::error::Error as StdError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::fs_utils::{create_parent_dir, part_path_for, remove_file_if_exists};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },
    #[error("failed to fetch {url}: server responded with HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded,
    CacheHit,
}

impl DownloadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::CacheHit => "cache-hit",
        }
    }
}

/// Blocking client with no overall request deadline; archives are large and
/// only the connect phase is bounded.
pub fn http_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent())
        .connect_timeout(config.connect_timeout())
        .timeout(None::<Duration>)
        .build()
        .context("failed to build http client")
}

/// Streams `url` into `destination` and returns it once the file is flushed.
///
/// The body lands in `<destination>.part` first, so a failed transfer never
/// leaves anything at `destination`.
pub fn fetch_to_path(client: &Client, url: &str, destination: &Path) -> Result<PathBuf> {
    create_parent_dir(destination)?;
    let part_path = part_path_for(destination);

    let written = match stream_to_file(client, url, &part_path) {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&part_path);
            return Err(err);
        }
    };

    remove_file_if_exists(destination)
        .with_context(|| format!("failed to replace {}", destination.display()))?;
    fs::rename(&part_path, destination).with_context(|| {
        format!(
            "failed to move downloaded file into place: {}",
            destination.display()
        )
    })?;

    debug!(url, path = %destination.display(), bytes = written, "download complete");
    Ok(destination.to_path_buf())
}

/// Runs `fetch` only when `destination` does not exist yet. Existence is the
/// only check; contents are not verified.
pub fn download_if_missing<Fetch>(
    url: &str,
    destination: &Path,
    fetch: Fetch,
) -> Result<DownloadStatus>
where
    Fetch: FnOnce(&str, &Path) -> Result<()>,
{
    if destination.exists() {
        debug!(url, path = %destination.display(), "already downloaded");
        return Ok(DownloadStatus::CacheHit);
    }

    info!(url, path = %destination.display(), "downloading");
    fetch(url, destination)?;
    Ok(DownloadStatus::Downloaded)
}

fn stream_to_file(client: &Client, url: &str, part_path: &Path) -> Result<u64> {
    let mut response = client
        .get(url)
        .send()
        .map_err(|err| transport_error(url, &err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let mut file = File::create(part_path)
        .with_context(|| format!("failed to create {}", part_path.display()))?;
    let written = response
        .copy_to(&mut file)
        .map_err(|err| transport_error(url, &err))?;
    file.flush()
        .with_context(|| format!("failed to flush {}", part_path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync {}", part_path.display()))?;
    Ok(written)
}

fn transport_error(url: &str, err: &reqwest::Error) -> anyhow::Error {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !cause_text.is_empty() && !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    if message.trim().is_empty() {
        message = "transport error".to_string();
    }

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
    .into()
}
