// src/file.rs

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::chart::ChartSpec;
use crate::runner::PipelineError;

pub fn ensure_directory(dir: &Path) -> Result<(), PipelineError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PipelineError::Config(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    }
    Ok(())
}

/// Create the parent of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<(), PipelineError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// `<name>.tmp` next to `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(join!(&name, ".tmp"))
}

/// Write through a sibling temp file, then rename it over `path`. Readers
/// see either the previous file or the complete new one; a failed or
/// interrupted write leaves no partial file under the real name.
pub fn write_atomic<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, write);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename<F>(tmp: &Path, path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(tmp)?);
    write(&mut out)?;
    out.flush()?;
    out.get_ref().sync_all()?;
    drop(out);
    fs::rename(tmp, path)
}

/// `<dir>/<region>_<area>_<category>_<lang>.png`
pub fn chart_path(dir: &Path, spec: &ChartSpec) -> PathBuf {
    dir.join(join!(&spec.file_stem(), ".png"))
}

/// `<dir>/completion_report_YYYYMMDD_HHMMSS.json`
pub fn report_path(dir: &Path, at: &DateTime<Local>) -> PathBuf {
    dir.join(format!("completion_report_{}.json", at.format("%Y%m%d_%H%M%S")))
}
