use crate::archive::ArchiveFormat;
use crate::artifact::ArtifactKey;
use crate::platform::{canonical_arch_name, canonical_platform_name, Arch, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Pull a single entry out of a zip archive. `{version}` in the entry
    /// name is substituted like the URL template.
    ZipEntry { entry: &'static str },
    /// Unpack a tar archive with its top-level directory stripped, then move
    /// `entry` into place.
    TarStripped { entry: &'static str },
}

impl Extraction {
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            Self::ZipEntry { .. } => ArchiveFormat::Zip,
            Self::TarStripped { .. } => ArchiveFormat::TarXz,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZipEntry { .. } => "zip-entry",
            Self::TarStripped { .. } => "tar-strip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixEntry {
    pub platform: Platform,
    pub arch: Arch,
    pub url_template: &'static str,
    pub default_version: &'static str,
    pub extraction: Extraction,
}

pub const PLATFORM_MATRIX: &[MatrixEntry] = &[
    MatrixEntry {
        platform: Platform::Darwin,
        arch: Arch::X64,
        url_template: "https://www.osxexperts.net/ffmpeg{version_compact}intel.zip",
        default_version: "6.1",
        extraction: Extraction::ZipEntry { entry: "ffmpeg" },
    },
    MatrixEntry {
        platform: Platform::Darwin,
        arch: Arch::Arm64,
        url_template: "https://www.osxexperts.net/ffmpeg{version_compact}arm.zip",
        default_version: "6.1.1",
        extraction: Extraction::ZipEntry { entry: "ffmpeg" },
    },
    MatrixEntry {
        platform: Platform::Linux,
        arch: Arch::X64,
        url_template:
            "https://johnvansickle.com/ffmpeg/releases/ffmpeg-{version}-amd64-static.tar.xz",
        default_version: "release",
        extraction: Extraction::TarStripped { entry: "ffmpeg" },
    },
    MatrixEntry {
        platform: Platform::Linux,
        arch: Arch::Arm64,
        url_template:
            "https://johnvansickle.com/ffmpeg/releases/ffmpeg-{version}-arm64-static.tar.xz",
        default_version: "release",
        extraction: Extraction::TarStripped { entry: "ffmpeg" },
    },
    MatrixEntry {
        platform: Platform::Win32,
        arch: Arch::X64,
        url_template:
            "https://www.gyan.dev/ffmpeg/builds/packages/ffmpeg-{version}-essentials_build.zip",
        default_version: "6.1.1",
        extraction: Extraction::ZipEntry {
            entry: "ffmpeg-{version}-essentials_build/bin/ffmpeg.exe",
        },
    },
];

impl MatrixEntry {
    /// `<platform>-<arch>`, the key used for version overrides.
    pub fn id(&self) -> String {
        format!("{}-{}", self.platform, self.arch)
    }

    pub fn url(&self, version: &str) -> String {
        render_template(self.url_template, version)
    }

    pub fn entry_name(&self, version: &str) -> String {
        match self.extraction {
            Extraction::ZipEntry { entry } | Extraction::TarStripped { entry } => {
                render_template(entry, version)
            }
        }
    }

    pub fn key(&self, version: &str) -> ArtifactKey {
        ArtifactKey::new(self.platform.as_str(), self.arch.as_str(), version, None)
    }
}

pub fn render_template(template: &str, version: &str) -> String {
    template
        .replace("{version_compact}", &version.replace('.', ""))
        .replace("{version}", version)
}

pub fn find_entry(id: &str) -> Option<&'static MatrixEntry> {
    PLATFORM_MATRIX.iter().find(|entry| entry.id() == id)
}

/// Positional selectors narrowing the matrix. `None` on an axis matches
/// every value on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixFilter {
    platform: Option<String>,
    arch: Option<String>,
}

impl MatrixFilter {
    pub fn new(platform: Option<&str>, arch: Option<&str>) -> Self {
        Self {
            platform: platform
                .filter(|value| !value.trim().is_empty())
                .map(canonical_platform_name),
            arch: arch
                .filter(|value| !value.trim().is_empty())
                .map(canonical_arch_name),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    pub fn matches(&self, entry: &MatrixEntry) -> bool {
        self.platform
            .as_deref()
            .map_or(true, |platform| platform == entry.platform.as_str())
            && self
                .arch
                .as_deref()
                .map_or(true, |arch| arch == entry.arch.as_str())
    }

    pub fn select(&self) -> impl Iterator<Item = &'static MatrixEntry> + '_ {
        PLATFORM_MATRIX.iter().filter(move |entry| self.matches(entry))
    }
}
