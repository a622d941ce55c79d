use anyhow::{Context, Result};
use ffmpeg_fetch_core::{
    artifact_file_name, host_arch_name, host_platform_name, ArchiveFormat, ArtifactKey,
    ArtifactPaths,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    download_dir: PathBuf,
    artifact_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(download_dir: impl Into<PathBuf>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            artifact_dir: artifact_dir.into(),
        }
    }

    pub fn for_package_root(root: &Path) -> Self {
        Self::new(
            root.join(DEFAULT_DOWNLOAD_DIR),
            root.join(DEFAULT_ARTIFACT_DIR),
        )
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn artifact_path(&self, platform: &str, arch: &str) -> PathBuf {
        self.artifact_dir
            .join(artifact_file_name(platform, arch, None))
    }

    pub fn host_artifact_path(&self) -> PathBuf {
        self.artifact_path(&host_platform_name(), &host_arch_name())
    }

    pub fn paths_for(&self, key: &ArtifactKey, format: ArchiveFormat) -> ArtifactPaths {
        ArtifactPaths::derive(key, format, &self.download_dir, &self.artifact_dir)
    }

    pub fn extraction_scratch_dir(&self, file_name: &str) -> PathBuf {
        self.download_dir.join(format!("{file_name}.tmp"))
    }

    pub fn ensure_download_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.download_dir)
            .with_context(|| format!("failed to create {}", self.download_dir.display()))
    }

    pub fn ensure_artifact_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.artifact_dir)
            .with_context(|| format!("failed to create {}", self.artifact_dir.display()))
    }

    /// Deletes every previously produced artifact and recreates the directory.
    pub fn reset_artifact_dir(&self) -> Result<()> {
        match fs::remove_dir_all(&self.artifact_dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| {
                    format!(
                        "failed to remove artifact directory: {}",
                        self.artifact_dir.display()
                    )
                })
            }
        }
        self.ensure_artifact_dir()
    }
}
