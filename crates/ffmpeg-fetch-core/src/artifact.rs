use std::path::{Path, PathBuf};

use crate::archive::ArchiveFormat;

pub const ARTIFACT_STEM: &str = "ffmpeg";

/// Final artifact file name, `ffmpeg-<platform>-<arch><suffix>`.
///
/// When `suffix` is `None` it defaults to `.exe` for `win32` and to nothing
/// otherwise. Platform and arch are not validated.
pub fn artifact_file_name(platform: &str, arch: &str, suffix: Option<&str>) -> String {
    let suffix = suffix.unwrap_or_else(|| default_suffix(platform));
    format!("{ARTIFACT_STEM}-{platform}-{arch}{suffix}")
}

pub fn default_suffix(platform: &str) -> &'static str {
    if platform == "win32" {
        ".exe"
    } else {
        ""
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    platform: String,
    arch: String,
    version: String,
    suffix: String,
}

impl ArtifactKey {
    pub fn new(
        platform: impl Into<String>,
        arch: impl Into<String>,
        version: impl Into<String>,
        suffix: Option<&str>,
    ) -> Self {
        let platform = platform.into();
        let suffix = suffix
            .unwrap_or_else(|| default_suffix(&platform))
            .to_string();
        Self {
            platform,
            arch: arch.into(),
            version: version.into(),
            suffix,
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn file_name(&self) -> String {
        artifact_file_name(&self.platform, &self.arch, Some(&self.suffix))
    }

    /// Cache file name for the raw download; carries the version so
    /// different releases never collide in the download directory.
    pub fn download_file_name(&self, format: ArchiveFormat) -> String {
        format!(
            "{ARTIFACT_STEM}-{}-{}-{}{}",
            self.platform,
            self.arch,
            self.version,
            format.cache_extension()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub file_name: String,
    pub download_path: PathBuf,
    pub final_path: PathBuf,
}

impl ArtifactPaths {
    pub fn derive(
        key: &ArtifactKey,
        format: ArchiveFormat,
        download_dir: &Path,
        artifact_dir: &Path,
    ) -> Self {
        let file_name = key.file_name();
        Self {
            download_path: download_dir.join(key.download_file_name(format)),
            final_path: artifact_dir.join(&file_name),
            file_name,
        }
    }
}
