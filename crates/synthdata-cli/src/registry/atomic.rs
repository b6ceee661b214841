//! Crash-safe writes for run artifacts.
//!
//! Every file a run leaves behind goes through [`write_artifact`]: the config,
//! the exports and the generation and validation reports. A reader of a
//! [`RunPaths`](super::RunPaths) directory sees either the previous file or
//! the complete new one.

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{RegistryError, RegistryResult};

/// Pretty-printed JSON artifact such as the run config or the report.
pub fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    write_artifact(path, &data)
}

/// Write into a hidden `.{name}.partial` sibling, sync, then rename over `path`.
/// Missing parent directories are created, so `--out-dir` targets may not exist yet.
pub fn write_artifact(path: &Path, data: &[u8]) -> RegistryResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let partial = partial_path(path)?;
    let result = write_synced(&partial, data).and_then(|()| std::fs::rename(&partial, path));
    if let Err(err) = result {
        std::fs::remove_file(&partial).ok();
        return Err(err.into());
    }
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn partial_path(path: &Path) -> RegistryResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        RegistryError::InvalidPath(format!("'{}' has no file name", path.display()))
    })?;
    Ok(path.with_file_name(format!(".{}.partial", file_name.to_string_lossy())))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    File::open(path)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
