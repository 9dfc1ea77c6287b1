//! Observability.
//!
//! The library itself only emits `tracing` events. Binaries call [`init`]
//! once to install a subscriber.

mod logging;

pub use logging::{ENV_LOG, ENV_LOG_FILE, ENV_LOG_FORMAT, LogFormat, LoggingConfig};

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

static OBSERVABILITY_INIT: OnceLock<()> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error if logging was already initialized or the log file
/// cannot be opened.
pub fn init(config: LoggingConfig) -> Result<()> {
    if OBSERVABILITY_INIT.get().is_some() {
        return Err(init_failed("observability already initialized"));
    }

    let layer = fmt_layer(config.format, config.file.as_deref())?;
    tracing_subscriber::registry()
        .with(layer)
        .with(config.filter)
        .try_init()
        .map_err(init_failed)?;

    OBSERVABILITY_INIT
        .set(())
        .map_err(|()| init_failed("failed to mark observability initialized"))
}

/// Builds the fmt layer for `format`, writing to `file` or stderr.
///
/// File output never carries ANSI colors; pretty output to a file uses the
/// single-line layout.
fn fmt_layer(format: LogFormat, file: Option<&Path>) -> Result<BoxedLayer> {
    let writer = match file {
        Some(path) => BoxMakeWriter::new(open_log_file(path)?),
        None => BoxMakeWriter::new(io::stderr),
    };
    let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_target(true);

    Ok(match (format, file.is_some()) {
        (LogFormat::Json, _) => layer.json().with_current_span(true).boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(false).boxed(),
        (LogFormat::Pretty, false) => layer.pretty().boxed(),
    })
}

/// Opens `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Result<Mutex<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
            operation: "create_log_dir".to_string(),
            cause: format!("{}: {e}", parent.display()),
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(Mutex::new)
        .map_err(|e| Error::OperationFailed {
            operation: "open_log_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
}

fn init_failed(cause: impl std::fmt::Display) -> Error {
    Error::OperationFailed {
        operation: "observability_init".to_string(),
        cause: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bravozero.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "first\n").unwrap();

        let file = open_log_file(&path).unwrap();
        writeln!(file.lock().unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_missing_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("bravozero.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_fmt_layer_for_every_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bravozero.log");
        for format in [LogFormat::Json, LogFormat::Pretty] {
            assert!(fmt_layer(format, None).is_ok());
            assert!(fmt_layer(format, Some(&path)).is_ok());
        }
        assert!(path.exists());
    }

    #[test]
    fn test_fmt_layer_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = fmt_layer(LogFormat::Json, Some(&blocker.join("x.log"))).err().unwrap();
        assert!(matches!(err, Error::OperationFailed { operation, .. } if operation == "create_log_dir"));
    }
}
