/// Container format of a matrix download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarXz,
}

impl ArchiveFormat {
    /// Suffix appended to cached downloads of this format, leading dot included.
    pub fn cache_extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::TarXz => ".tar.xz",
        }
    }
}
