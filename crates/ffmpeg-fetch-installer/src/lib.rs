mod config;
mod env;
mod extract;
mod fetch;
mod fs_utils;
mod layout;
mod orchestrate;
mod postinstall;

pub use config::{FetchConfig, DEFAULT_CONFIG_FILE, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use env::{
    is_truthy, EnvSource, ProcessEnv, BINARY_PATH_ENV, LEGACY_BINARY_PATH_ENV,
    LEGACY_SKIP_INSTALL_ENV, SKIP_INSTALL_ENV,
};
pub use extract::{
    extract_tar_entry, extract_tar_entry_with_runner, extract_zip_entry, ToolExitError,
};
pub use fetch::{download_if_missing, fetch_to_path, http_client, DownloadStatus, FetchError};
pub use layout::{ArtifactLayout, DEFAULT_ARTIFACT_DIR, DEFAULT_DOWNLOAD_DIR};
pub use orchestrate::{
    prepare_directories, run_matrix, ArtifactDirMode, ExtractStep, LiveHooks, MatrixHooks,
    MatrixOutcome, MatrixReport,
};
pub use postinstall::{
    install_skip_reason, locate_ffmpeg, run_install, run_install_with_fetcher, InstallOutcome,
    InstallTarget, SkipReason,
};
