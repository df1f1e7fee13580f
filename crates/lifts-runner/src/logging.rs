use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lifts_scripting_host::{LiftsConfig, LoggingConfig};

/// Log files past this size are emptied when the host starts
const LOG_ROLLOVER_BYTES: u64 = 1024 * 1024;

/// Install the global subscriber: the console always, plus
/// `<data dir>/logs/<name>.log` when `config.file` is set.
///
/// Keep the returned guard alive until exit, or buffered file lines are lost.
pub fn init_logging(name: &str, config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let (path, file_layer, guard) = if config.file {
        let path = log_directory()?.join(format!("{}.log", name));
        let (writer, guard) = tracing_appender::non_blocking(open_log_file(&path)?);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(path), Some(layer), Some(guard))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(path) = path {
        tracing::info!("Logging to file: {}", path.display());
    }

    Ok(guard)
}

fn log_directory() -> io::Result<PathBuf> {
    LiftsConfig::project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory for log files"))
}

/// Open `path` for appending, emptying it first if it has grown too big
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let oversized = fs::metadata(path).is_ok_and(|meta| meta.len() > LOG_ROLLOVER_BYTES);
    if oversized {
        File::create(path)?;
    }

    OpenOptions::new().create(true).append(true).open(path)
}
