use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use super::{RegistryError, RegistryResult, RunPaths};

/// Send engine events of this process to the run's `logs.ndjson`, one JSON
/// object per line with an RFC 3339 UTC timestamp.
///
/// `RUST_LOG` selects the level; `info` when unset. Only the first call per
/// process installs a subscriber.
pub fn init_run_logging(paths: &RunPaths) -> RegistryResult<()> {
    let writer = RunLogWriter::open(paths)?;
    let make_writer = BoxMakeWriter::new(move || writer.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(make_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| RegistryError::Logging(err.to_string()))
}

/// Appends to `logs.ndjson`; clones share one file handle so lines from the
/// engine's worker threads never interleave.
#[derive(Clone)]
struct RunLogWriter {
    file: Arc<Mutex<File>>,
}

impl RunLogWriter {
    fn open(paths: &RunPaths) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&paths.logs_path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn with_file<T>(&self, op: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("run log lock poisoned"))?;
        op(&mut file)
    }
}

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_append_to_the_same_log() {
        let root = std::env::temp_dir().join(format!("synthdata-log-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("create run dir");
        let paths = RunPaths {
            config_path: root.join("config.json"),
            logs_path: root.join("logs.ndjson"),
            report_path: root.join("generation_report.json"),
            root: root.clone(),
        };

        let mut first = RunLogWriter::open(&paths).expect("open log");
        let mut second = first.clone();
        first.write_all(b"{\"table\":\"users\"}\n").expect("write first");
        second.write_all(b"{\"table\":\"orders\"}\n").expect("write second");
        second.flush().expect("flush");

        let contents = std::fs::read_to_string(&paths.logs_path).expect("read log");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with("{\"table\":\"orders\"}\n"));
        std::fs::remove_dir_all(&root).ok();
    }
}
