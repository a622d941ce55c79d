use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Darwin,
    Linux,
    Win32,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Win32 => "win32",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" | "mac" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "win32" | "windows" | "win" => Some(Self::Win32),
            _ => None,
        }
    }

    /// Default executable suffix for binaries built for this platform.
    pub fn executable_suffix(self) -> &'static str {
        match self {
            Self::Win32 => ".exe",
            Self::Darwin | Self::Linux => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Some(Self::X64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical name of a platform selector. Known aliases collapse onto the
/// canonical identifier; anything else is returned untouched.
pub fn canonical_platform_name(input: &str) -> String {
    Platform::parse(input)
        .map(|platform| platform.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

pub fn canonical_arch_name(input: &str) -> String {
    Arch::parse(input)
        .map(|arch| arch.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

pub fn host_platform_name() -> String {
    canonical_platform_name(std::env::consts::OS)
}

pub fn host_arch_name() -> String {
    canonical_arch_name(std::env::consts::ARCH)
}
