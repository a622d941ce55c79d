mod archive;
mod artifact;
mod matrix;
mod package;
mod platform;

pub use archive::ArchiveFormat;
pub use artifact::{artifact_file_name, default_suffix, ArtifactKey, ArtifactPaths, ARTIFACT_STEM};
pub use matrix::{
    find_entry, render_template, Extraction, MatrixEntry, MatrixFilter, PLATFORM_MATRIX,
};
pub use package::{release_asset_url, release_version, PackageMetadata, PACKAGE_MANIFEST_FILE};
pub use platform::{
    canonical_arch_name, canonical_platform_name, host_arch_name, host_platform_name, Arch,
    Platform,
};

#[cfg(test)]
mod tests;
