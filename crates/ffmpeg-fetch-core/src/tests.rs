use std::path::Path;

use super::*;

#[test]
fn artifact_file_name_appends_exe_only_for_win32() {
    for entry in PLATFORM_MATRIX {
        let name = artifact_file_name(entry.platform.as_str(), entry.arch.as_str(), None);
        let expected = if entry.platform == Platform::Win32 {
            format!("ffmpeg-{}-{}.exe", entry.platform, entry.arch)
        } else {
            format!("ffmpeg-{}-{}", entry.platform, entry.arch)
        };
        assert_eq!(name, expected, "unexpected name for {}", entry.id());
    }
}

#[test]
fn artifact_file_name_passes_unknown_values_through() {
    assert_eq!(
        artifact_file_name("freebsd", "riscv64", None),
        "ffmpeg-freebsd-riscv64"
    );
    assert_eq!(
        artifact_file_name("linux", "x64", Some(".bin")),
        "ffmpeg-linux-x64.bin"
    );
    assert_eq!(artifact_file_name("win32", "x64", Some("")), "ffmpeg-win32-x64");
}

#[test]
fn artifact_key_derives_download_and_final_paths() {
    let key = ArtifactKey::new("darwin", "arm64", "6.1.1", None);
    let paths = ArtifactPaths::derive(
        &key,
        ArchiveFormat::Zip,
        Path::new("/pkg/downloads"),
        Path::new("/pkg/artifacts"),
    );

    assert_eq!(paths.file_name, "ffmpeg-darwin-arm64");
    assert_eq!(
        paths.download_path,
        Path::new("/pkg/downloads").join("ffmpeg-darwin-arm64-6.1.1.zip")
    );
    assert_eq!(
        paths.final_path,
        Path::new("/pkg/artifacts").join("ffmpeg-darwin-arm64")
    );
}

#[test]
fn artifact_key_defaults_suffix_from_platform() {
    let windows = ArtifactKey::new("win32", "x64", "6.1.1", None);
    assert_eq!(windows.suffix(), ".exe");
    assert_eq!(windows.file_name(), "ffmpeg-win32-x64.exe");
    assert_eq!(
        windows.download_file_name(ArchiveFormat::Zip),
        "ffmpeg-win32-x64-6.1.1.zip"
    );

    let linux = ArtifactKey::new("linux", "x64", "release", None);
    assert_eq!(linux.suffix(), "");
    assert_eq!(
        linux.download_file_name(ArchiveFormat::TarXz),
        "ffmpeg-linux-x64-release.tar.xz"
    );
}

#[test]
fn matrix_urls_end_with_extraction_format_extension() {
    for entry in PLATFORM_MATRIX {
        let url = entry.url(entry.default_version);
        let extension = entry.extraction.archive_format().cache_extension();
        assert!(url.ends_with(extension), "{url} should end with {extension}");
    }
}

#[test]
fn matrix_covers_supported_pairs_in_order() {
    let ids = PLATFORM_MATRIX
        .iter()
        .map(MatrixEntry::id)
        .collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            "darwin-x64",
            "darwin-arm64",
            "linux-x64",
            "linux-arm64",
            "win32-x64"
        ]
    );
}

#[test]
fn matrix_urls_substitute_version() {
    let mac_intel = find_entry("darwin-x64").expect("darwin-x64 entry");
    assert_eq!(
        mac_intel.url("6.1"),
        "https://www.osxexperts.net/ffmpeg61intel.zip"
    );

    let mac_arm = find_entry("darwin-arm64").expect("darwin-arm64 entry");
    assert_eq!(
        mac_arm.url("6.1.1"),
        "https://www.osxexperts.net/ffmpeg611arm.zip"
    );

    let windows = find_entry("win32-x64").expect("win32-x64 entry");
    assert_eq!(
        windows.url("6.1.1"),
        "https://www.gyan.dev/ffmpeg/builds/packages/ffmpeg-6.1.1-essentials_build.zip"
    );
    assert_eq!(
        windows.entry_name("6.1.1"),
        "ffmpeg-6.1.1-essentials_build/bin/ffmpeg.exe"
    );
}

#[test]
fn linux_arm64_uses_arm64_archive() {
    let entry = find_entry("linux-arm64").expect("linux-arm64 entry");
    let url = entry.url("release");
    assert_eq!(
        url,
        "https://johnvansickle.com/ffmpeg/releases/ffmpeg-release-arm64-static.tar.xz"
    );
    assert!(!url.contains("amd64"));
    assert_eq!(entry.entry_name("release"), "ffmpeg");
}

#[test]
fn matrix_filter_selects_exact_pair() {
    let filter = MatrixFilter::new(Some("linux"), Some("x64"));
    let selected = filter.select().map(MatrixEntry::id).collect::<Vec<_>>();
    assert_eq!(selected, vec!["linux-x64"]);
}

#[test]
fn matrix_filter_missing_axis_matches_everything_on_it() {
    let darwin = MatrixFilter::new(Some("darwin"), None);
    assert_eq!(darwin.select().count(), 2);

    let arm = MatrixFilter::new(None, Some("arm64"));
    let ids = arm.select().map(MatrixEntry::id).collect::<Vec<_>>();
    assert_eq!(ids, vec!["darwin-arm64", "linux-arm64"]);

    assert_eq!(MatrixFilter::all().select().count(), PLATFORM_MATRIX.len());
    assert_eq!(MatrixFilter::new(Some(""), None).select().count(), 5);
}

#[test]
fn matrix_filter_normalizes_aliases() {
    let filter = MatrixFilter::new(Some("windows"), Some("x86_64"));
    assert_eq!(filter.platform(), Some("win32"));
    assert_eq!(filter.arch(), Some("x64"));
    assert_eq!(filter.select().count(), 1);
}

#[test]
fn matrix_filter_unknown_platform_matches_nothing() {
    let filter = MatrixFilter::new(Some("freebsd"), None);
    assert_eq!(filter.platform(), Some("freebsd"));
    assert_eq!(filter.select().count(), 0);
}

#[test]
fn platform_and_arch_parse_aliases() {
    assert_eq!(Platform::parse("macOS"), Some(Platform::Darwin));
    assert_eq!(Platform::parse("win32"), Some(Platform::Win32));
    assert_eq!(Platform::parse("plan9"), None);
    assert_eq!(Arch::parse("aarch64"), Some(Arch::Arm64));
    assert_eq!(Arch::parse("amd64"), Some(Arch::X64));
    assert_eq!(canonical_platform_name("solaris"), "solaris");
    assert_eq!(canonical_arch_name("x86_64"), "x64");
    assert_eq!(Platform::Win32.executable_suffix(), ".exe");
}

#[test]
fn release_version_strips_prerelease() {
    assert_eq!(release_version("1.4.2-beta.3"), "1.4.2");
    assert_eq!(release_version("1.4.2+build.7"), "1.4.2");
    assert_eq!(release_version("0.0.9"), "0.0.9");
    assert_eq!(release_version("6.1-rc1"), "6.1");
}

#[test]
fn release_asset_url_follows_release_convention() {
    let url = release_asset_url(
        "git+https://github.com/example/ffmpeg-fetch.git",
        "0.3.1-alpha.2",
        "win32",
        "x64",
    )
    .expect("url should build");
    assert_eq!(
        url,
        "https://github.com/example/ffmpeg-fetch/releases/download/v0.3.1/ffmpeg-win32-x64.exe"
    );

    let url = release_asset_url("https://github.com/example/ff", "2.0.0", "linux", "arm64")
        .expect("url should build");
    assert_eq!(
        url,
        "https://github.com/example/ff/releases/download/v2.0.0/ffmpeg-linux-arm64"
    );
}

#[test]
fn release_asset_url_requires_https_repository() {
    let err = release_asset_url("git@github.com:example/ff.git", "1.0.0", "linux", "x64")
        .expect_err("ssh remote must be rejected");
    assert!(err.to_string().contains("has no https:// component"));
}

#[test]
fn package_metadata_accepts_string_and_object_repository() {
    let detailed = PackageMetadata::from_json_str(
        r#"{
            "name": "@example/ffmpeg",
            "version": "1.2.0-beta.1",
            "repository": { "type": "git", "url": "git+https://github.com/example/ffmpeg.git" }
        }"#,
    )
    .expect("detailed repository should parse");
    assert_eq!(detailed.name, "@example/ffmpeg");
    assert_eq!(detailed.release_version(), "1.2.0");
    assert_eq!(
        detailed.release_asset_url("darwin", "arm64").expect("url"),
        "https://github.com/example/ffmpeg/releases/download/v1.2.0/ffmpeg-darwin-arm64"
    );

    let short = PackageMetadata::from_json_str(
        r#"{ "name": "ff", "version": "1.0.0", "repository": "https://github.com/example/ff" }"#,
    )
    .expect("string repository should parse");
    assert_eq!(short.repository_url, "https://github.com/example/ff");
}

#[test]
fn package_metadata_requires_repository() {
    let err = PackageMetadata::from_json_str(r#"{ "name": "ff", "version": "1.0.0" }"#)
        .expect_err("missing repository must fail");
    assert!(err.to_string().contains("does not declare a repository"));
}
