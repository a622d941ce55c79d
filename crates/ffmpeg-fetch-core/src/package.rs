use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use semver::Version;
use serde::Deserialize;

use crate::artifact::artifact_file_name;

pub const PACKAGE_MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub repository_url: String,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: String,
    version: String,
    repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepository {
    Url(String),
    Detailed { url: String },
}

impl PackageMetadata {
    pub fn from_json_str(input: &str) -> anyhow::Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(input).context("failed to parse package manifest")?;
        let repository_url = match raw.repository {
            Some(RawRepository::Url(url)) | Some(RawRepository::Detailed { url }) => url,
            None => {
                return Err(anyhow!(
                    "package manifest '{}' does not declare a repository",
                    raw.name
                ))
            }
        };
        Ok(Self {
            name: raw.name,
            version: raw.version,
            repository_url,
        })
    }

    pub fn load(package_root: &Path) -> anyhow::Result<Self> {
        let path = package_root.join(PACKAGE_MANIFEST_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn release_version(&self) -> String {
        release_version(&self.version)
    }

    pub fn release_asset_url(&self, platform: &str, arch: &str) -> anyhow::Result<String> {
        release_asset_url(&self.repository_url, &self.version, platform, arch)
    }
}

/// Drops any pre-release (and build) suffix: `1.2.3-beta.4` becomes `1.2.3`.
pub fn release_version(version: &str) -> String {
    match Version::parse(version.trim()) {
        Ok(parsed) => Version::new(parsed.major, parsed.minor, parsed.patch).to_string(),
        Err(_) => version
            .split('-')
            .next()
            .unwrap_or(version)
            .trim()
            .to_string(),
    }
}

/// Release asset URL following the `<repo>/releases/download/v<version>/<artifact>`
/// convention. Anything before the first `https://` (such as a `git+` prefix)
/// is dropped.
pub fn release_asset_url(
    repository_url: &str,
    version: &str,
    platform: &str,
    arch: &str,
) -> anyhow::Result<String> {
    let start = repository_url.find("https://").ok_or_else(|| {
        anyhow!("repository url '{repository_url}' has no https:// component")
    })?;
    let base = repository_url[start..].trim_end_matches('/');
    let base = base.strip_suffix(".git").unwrap_or(base);
    Ok(format!(
        "{base}/releases/download/v{}/{}",
        release_version(version),
        artifact_file_name(platform, arch, None)
    ))
}
