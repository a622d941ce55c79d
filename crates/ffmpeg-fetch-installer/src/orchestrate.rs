use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ffmpeg_fetch_core::{Extraction, MatrixEntry, MatrixFilter};
use reqwest::blocking::Client;
use tracing::{debug, info_span};

use crate::config::FetchConfig;
use crate::extract::{extract_tar_entry, extract_zip_entry};
use crate::fetch::{download_if_missing, fetch_to_path, DownloadStatus};
use crate::layout::ArtifactLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactDirMode {
    /// Wipe the artifact directory before the run.
    Reset,
    /// Keep existing artifacts; only make sure the directory exists.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractStep<'a> {
    pub archive_path: &'a Path,
    pub entry_name: &'a str,
    pub scratch_dir: &'a Path,
    pub target: &'a Path,
}

pub trait MatrixHooks {
    fn fetch(&mut self, url: &str, destination: &Path) -> Result<()>;
    fn extract(&mut self, extraction: Extraction, step: &ExtractStep<'_>) -> Result<PathBuf>;
}

/// Real network and archive work.
#[derive(Debug, Clone)]
pub struct LiveHooks {
    client: Client,
}

impl LiveHooks {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl MatrixHooks for LiveHooks {
    fn fetch(&mut self, url: &str, destination: &Path) -> Result<()> {
        fetch_to_path(&self.client, url, destination).map(|_| ())
    }

    fn extract(&mut self, extraction: Extraction, step: &ExtractStep<'_>) -> Result<PathBuf> {
        match extraction {
            Extraction::ZipEntry { .. } => {
                extract_zip_entry(step.archive_path, step.entry_name, step.target)
            }
            Extraction::TarStripped { .. } => extract_tar_entry(
                step.archive_path,
                step.entry_name,
                step.scratch_dir,
                step.target,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixOutcome {
    pub id: String,
    pub version: String,
    pub url: String,
    pub download_status: DownloadStatus,
    pub download_path: PathBuf,
    pub final_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixReport {
    pub outcomes: Vec<MatrixOutcome>,
}

impl MatrixReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

pub fn prepare_directories(layout: &ArtifactLayout, mode: ArtifactDirMode) -> Result<()> {
    layout.ensure_download_dir()?;
    match mode {
        ArtifactDirMode::Reset => layout.reset_artifact_dir(),
        ArtifactDirMode::Preserve => layout.ensure_artifact_dir(),
    }?;
    debug!(
        download_dir = %layout.download_dir().display(),
        artifact_dir = %layout.artifact_dir().display(),
        ?mode,
        "prepared directories"
    );
    Ok(())
}

/// Processes every matrix entry selected by `filter`, one after another.
pub fn run_matrix<H: MatrixHooks>(
    layout: &ArtifactLayout,
    filter: &MatrixFilter,
    config: &FetchConfig,
    mode: ArtifactDirMode,
    hooks: &mut H,
) -> Result<MatrixReport> {
    prepare_directories(layout, mode)?;

    let mut report = MatrixReport::default();
    for entry in filter.select() {
        let outcome = process_entry(layout, entry, config, hooks)
            .with_context(|| format!("failed to provision ffmpeg for {}", entry.id()))?;
        report.outcomes.push(outcome);
    }
    Ok(report)
}

fn process_entry<H: MatrixHooks>(
    layout: &ArtifactLayout,
    entry: &MatrixEntry,
    config: &FetchConfig,
    hooks: &mut H,
) -> Result<MatrixOutcome> {
    let version = config.version_for(entry);
    let url = entry.url(&version);
    let key = entry.key(&version);
    let paths = layout.paths_for(&key, entry.extraction.archive_format());

    let _span = info_span!("provision", platform = %entry.platform, arch = %entry.arch).entered();
    let download_status =
        download_if_missing(&url, &paths.download_path, |url, destination| {
            hooks.fetch(url, destination)
        })?;

    let entry_name = entry.entry_name(&version);
    let scratch_dir = layout.extraction_scratch_dir(&paths.file_name);
    let final_path = hooks.extract(
        entry.extraction,
        &ExtractStep {
            archive_path: &paths.download_path,
            entry_name: &entry_name,
            scratch_dir: &scratch_dir,
            target: &paths.final_path,
        },
    )?;

    Ok(MatrixOutcome {
        id: entry.id(),
        version,
        url,
        download_status,
        download_path: paths.download_path,
        final_path,
    })
}
