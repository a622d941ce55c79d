use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::fs_utils::{
    create_parent_dir, mark_executable, move_file_or_copy, part_path_for, remove_file_if_exists,
};

#[derive(Debug, Error)]
#[error("{program} exited with {}: stderr='{stderr}'", describe_exit(.code))]
pub struct ToolExitError {
    pub program: String,
    pub code: Option<i32>,
    pub stderr: String,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Extracts the single zip entry named `entry` (possibly nested, such as
/// `build/bin/ffmpeg.exe`) to `target`, replacing whatever was there.
pub fn extract_zip_entry(archive_path: &Path, entry: &str, target: &Path) -> Result<PathBuf> {
    info!(
        archive = %archive_path.display(),
        entry,
        path = %target.display(),
        "extracting"
    );

    let file = File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive {}", archive_path.display()))?;
    let mut zipped = match archive.by_name(entry) {
        Ok(zipped) => zipped,
        Err(ZipError::FileNotFound) => {
            return Err(anyhow!(
                "entry '{entry}' was not found in zip archive {}",
                archive_path.display()
            ));
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "failed to read entry '{entry}' from zip archive {}",
                    archive_path.display()
                )
            });
        }
    };

    create_parent_dir(target)?;
    let part_path = part_path_for(target);
    if let Err(err) = write_zip_entry(&mut zipped, &part_path) {
        let _ = fs::remove_file(&part_path);
        return Err(err).with_context(|| {
            format!(
                "failed to extract '{entry}' from {} to {}",
                archive_path.display(),
                target.display()
            )
        });
    }

    remove_file_if_exists(target)
        .with_context(|| format!("failed to replace {}", target.display()))?;
    fs::rename(&part_path, target).with_context(|| {
        format!(
            "failed to move extracted entry into place: {}",
            target.display()
        )
    })?;
    mark_executable(target)?;
    Ok(target.to_path_buf())
}

/// The zip reader verifies the entry checksum at end of stream, so a corrupt
/// entry fails here after most of its bytes are written.
fn write_zip_entry(zipped: &mut impl Read, part_path: &Path) -> Result<()> {
    let mut out = File::create(part_path)
        .with_context(|| format!("failed to create {}", part_path.display()))?;
    io::copy(zipped, &mut out)?;
    out.flush()
        .with_context(|| format!("failed to flush {}", part_path.display()))?;
    Ok(())
}

pub fn extract_tar_entry(
    archive_path: &Path,
    entry: &str,
    scratch_dir: &Path,
    target: &Path,
) -> Result<PathBuf> {
    extract_tar_entry_with_runner(archive_path, entry, scratch_dir, target, run_command)
}

/// Unpacks `archive_path` into `scratch_dir` with the top-level directory
/// stripped, then moves `scratch_dir/<entry>` to `target`.
pub fn extract_tar_entry_with_runner<RunCommand>(
    archive_path: &Path,
    entry: &str,
    scratch_dir: &Path,
    target: &Path,
    mut run: RunCommand,
) -> Result<PathBuf>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<()>,
{
    info!(
        archive = %archive_path.display(),
        entry,
        path = %target.display(),
        "extracting"
    );

    match fs::remove_dir_all(scratch_dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to clear stale scratch dir {}", scratch_dir.display())
            })
        }
    }
    fs::create_dir_all(scratch_dir)
        .with_context(|| format!("failed to create {}", scratch_dir.display()))?;

    let mut command = build_tar_extract_command(archive_path, scratch_dir);
    run(&mut command, "failed to extract tar archive").map_err(|err| {
        if error_chain_has_not_found(&err) {
            return err.context(format!(
                "required extraction tool 'tar' was not found on PATH; install tar and retry. archive={}",
                archive_path.display()
            ));
        }
        err.context(format!(
            "failed to extract tar archive: archive={} scratch_dir={} extraction_command={:?}",
            archive_path.display(),
            scratch_dir.display(),
            command
        ))
    })?;

    let extracted = scratch_dir.join(entry);
    move_file_or_copy(&extracted, target).with_context(|| {
        format!(
            "entry '{entry}' missing after extracting {}",
            archive_path.display()
        )
    })?;
    mark_executable(target)?;

    if let Err(err) = fs::remove_dir_all(scratch_dir) {
        debug!(path = %scratch_dir.display(), error = %err, "failed to remove scratch dir");
    }
    Ok(target.to_path_buf())
}

pub(crate) fn build_tar_extract_command(archive_path: &Path, scratch_dir: &Path) -> Command {
    let mut command = Command::new("tar");
    command
        .arg("xf")
        .arg(archive_path)
        .arg("-C")
        .arg(scratch_dir)
        .arg("--strip-components=1");
    command
}

pub(crate) fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let program = command.get_program().to_string_lossy().into_owned();
    Err(ToolExitError {
        program,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
    .with_context(|| context_message.to_string())
}

fn error_chain_has_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}
