//! One-shot still capture through the external libcamera tool.

use crate::error::{Result, UtilError};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Filename timestamp, e.g. `capture_20260830_141503.jpg`.
const FILENAME_FORMAT: &str = "capture_%Y%m%d_%H%M%S.jpg";

/// Default output directory relative to the user's home.
const DEFAULT_SUBDIR: &str = "Pictures";

/// The default capture directory, `$HOME/Pictures`.
pub fn default_output_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .ok_or_else(|| UtilError::config("HOME is not set; cannot locate the Pictures directory"))?;
    Ok(PathBuf::from(home).join(DEFAULT_SUBDIR))
}

/// The destination path for a capture started now.
pub fn capture_path(out_dir: &Path) -> PathBuf {
    out_dir.join(Local::now().format(FILENAME_FORMAT).to_string())
}

/// Run the capture tool once against `path`. Success is judged solely by
/// the tool's exit status; there is no retry.
pub fn capture_to(path: &Path) -> Result<()> {
    let status = Command::new("libcamera-jpeg")
        .arg("-o")
        .arg(path)
        .status()
        .map_err(|err| UtilError::capture(format!("failed to run libcamera-jpeg: {err}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(UtilError::capture(format!(
            "libcamera-jpeg exited with {status}"
        )))
    }
}
