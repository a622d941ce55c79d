use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use ffmpeg_fetch_core::{host_arch_name, host_platform_name, PackageMetadata};
use reqwest::blocking::Client;
use tracing::info;

use crate::env::{
    is_truthy, EnvSource, BINARY_PATH_ENV, LEGACY_BINARY_PATH_ENV, LEGACY_SKIP_INSTALL_ENV,
    SKIP_INSTALL_ENV,
};
use crate::fetch::fetch_to_path;
use crate::fs_utils::mark_executable;
use crate::layout::ArtifactLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    SkipFlag { variable: &'static str },
    ExternalBinary {
        variable: &'static str,
        path: PathBuf,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkipFlag { variable } => write!(f, "{variable} is set"),
            Self::ExternalBinary { variable, path } => {
                write!(f, "{variable} points at {}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Skipped { reason: SkipReason },
    Installed { url: String, path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub platform: String,
    pub arch: String,
}

impl InstallTarget {
    pub fn host() -> Self {
        Self {
            platform: host_platform_name(),
            arch: host_arch_name(),
        }
    }
}

/// `FFMPEG_FETCH_SKIP_INSTALL` must be truthy; the legacy `SKIP_INSTALL`
/// skips on any non-empty value.
pub fn install_skip_reason(env: &dyn EnvSource) -> Option<SkipReason> {
    if env.var(SKIP_INSTALL_ENV).is_some_and(|value| is_truthy(&value)) {
        return Some(SkipReason::SkipFlag {
            variable: SKIP_INSTALL_ENV,
        });
    }
    if env.var(LEGACY_SKIP_INSTALL_ENV).is_some_and(|value| !value.is_empty()) {
        return Some(SkipReason::SkipFlag {
            variable: LEGACY_SKIP_INSTALL_ENV,
        });
    }

    external_binary(env).map(|(variable, path)| SkipReason::ExternalBinary { variable, path })
}

fn external_binary(env: &dyn EnvSource) -> Option<(&'static str, PathBuf)> {
    [BINARY_PATH_ENV, LEGACY_BINARY_PATH_ENV]
        .into_iter()
        .find_map(|variable| {
            env.var(variable)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .filter(|path| path.is_file())
                .map(|path| (variable, path))
        })
}

pub fn run_install(
    env: &dyn EnvSource,
    package_root: &Path,
    layout: &ArtifactLayout,
    client: &Client,
) -> Result<InstallOutcome> {
    run_install_with_fetcher(
        env,
        package_root,
        layout,
        &InstallTarget::host(),
        |url, destination| fetch_to_path(client, url, destination).map(|_| ()),
    )
}

/// Downloads the prebuilt release executable for `target` straight into the
/// artifact directory. No archive is involved.
///
/// The skip checks run before `package.json` is read, so a skipped install
/// needs no manifest.
pub fn run_install_with_fetcher<Fetch>(
    env: &dyn EnvSource,
    package_root: &Path,
    layout: &ArtifactLayout,
    target: &InstallTarget,
    fetch: Fetch,
) -> Result<InstallOutcome>
where
    Fetch: FnOnce(&str, &Path) -> Result<()>,
{
    if let Some(reason) = install_skip_reason(env) {
        info!(%reason, "skipping binary installation");
        return Ok(InstallOutcome::Skipped { reason });
    }

    let metadata = PackageMetadata::load(package_root)?;
    install_release(&metadata, layout, target, fetch)
}

fn install_release<Fetch>(
    metadata: &PackageMetadata,
    layout: &ArtifactLayout,
    target: &InstallTarget,
    fetch: Fetch,
) -> Result<InstallOutcome>
where
    Fetch: FnOnce(&str, &Path) -> Result<()>,
{
    let url = metadata.release_asset_url(&target.platform, &target.arch)?;
    let path = layout.artifact_path(&target.platform, &target.arch);
    info!(
        version = %metadata.release_version(),
        url = %url,
        path = %path.display(),
        "installing ffmpeg release binary"
    );

    layout.ensure_artifact_dir()?;
    fetch(&url, &path)?;
    mark_executable(&path)?;

    info!(path = %path.display(), "installed");
    Ok(InstallOutcome::Installed { url, path })
}

/// Resolves the ffmpeg binary a consumer should run: an existing
/// `FFMPEG_FETCH_PATH` (or legacy `SCRYPTED_FFMPEG_PATH`) wins, then the host
/// artifact.
pub fn locate_ffmpeg(env: &dyn EnvSource, layout: &ArtifactLayout) -> Result<PathBuf> {
    if let Some((_, path)) = external_binary(env) {
        return Ok(path);
    }

    let path = layout.host_artifact_path();
    if path.is_file() {
        return Ok(path);
    }
    Err(anyhow!(
        "ffmpeg binary not found at {}; run `ffmpeg-fetch install` or set {BINARY_PATH_ENV}",
        path.display()
    ))
}
