use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ffmpeg_fetch_core::{find_entry, MatrixEntry};
use serde::Deserialize;

use crate::layout::{ArtifactLayout, DEFAULT_ARTIFACT_DIR, DEFAULT_DOWNLOAD_DIR};

pub const DEFAULT_CONFIG_FILE: &str = "ffmpeg-fetch.toml";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("ffmpeg-fetch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    pub download_dir: Option<PathBuf>,
    pub artifact_dir: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
}

impl FetchConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse ffmpeg-fetch config")?;
        for (id, version) in &config.versions {
            if find_entry(id).is_none() {
                return Err(anyhow!(
                    "version override '{id}' does not name a supported platform; expected one of darwin-x64, darwin-arm64, linux-x64, linux-arm64, win32-x64"
                ));
            }
            if version.trim().is_empty() {
                return Err(anyhow!("version override '{id}' must not be empty"));
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads `<package_root>/ffmpeg-fetch.toml`, or the defaults when absent.
    pub fn load_from_package_root(package_root: &Path) -> Result<Self> {
        let path = package_root.join(DEFAULT_CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml_str(&raw)
                .with_context(|| format!("invalid config {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed reading config {}", path.display()))
            }
        }
    }

    /// Relative directories resolve against `package_root`.
    pub fn layout(&self, package_root: &Path) -> ArtifactLayout {
        let resolve = |configured: &Option<PathBuf>, default: &str| match configured {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => package_root.join(dir),
            None => package_root.join(default),
        };
        ArtifactLayout::new(
            resolve(&self.download_dir, DEFAULT_DOWNLOAD_DIR),
            resolve(&self.artifact_dir, DEFAULT_ARTIFACT_DIR),
        )
    }

    pub fn version_for(&self, entry: &MatrixEntry) -> String {
        self.versions
            .get(&entry.id())
            .cloned()
            .unwrap_or_else(|| entry.default_version.to_string())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
