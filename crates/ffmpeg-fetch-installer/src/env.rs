use std::collections::BTreeMap;

pub const SKIP_INSTALL_ENV: &str = "FFMPEG_FETCH_SKIP_INSTALL";
pub const LEGACY_SKIP_INSTALL_ENV: &str = "SKIP_INSTALL";
pub const BINARY_PATH_ENV: &str = "FFMPEG_FETCH_PATH";
pub const LEGACY_BINARY_PATH_ENV: &str = "SCRYPTED_FFMPEG_PATH";

pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Empty, `0`, `false`, `no` and `off` count as unset.
pub fn is_truthy(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    !matches!(normalized.as_str(), "" | "0" | "false" | "no" | "off")
}
