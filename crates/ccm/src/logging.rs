use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Size-based truncation of the log file, applied once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RotationPolicy {
    /// Size past which the file is truncated
    max_size: u64,
    /// Most recent bytes kept when truncating
    keep_size: u64,
}

impl RotationPolicy {
    /// Past 5 MB, keep the most recent 1 MB
    const DEFAULT: Self = Self {
        max_size: 5 * 1024 * 1024,
        keep_size: 1024 * 1024,
    };

    /// Whether the file was truncated
    fn apply(self, log_path: &Path) -> io::Result<bool> {
        let file_size = match fs::metadata(log_path) {
            Ok(metadata) => metadata.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };
        if file_size <= self.max_size {
            return Ok(false);
        }

        let mut tail = Vec::new();
        {
            let mut file = File::open(log_path)?;
            file.seek(SeekFrom::Start(file_size.saturating_sub(self.keep_size)))?;
            file.read_to_end(&mut tail)?;
        }
        // Resume at a line boundary
        let skip = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);

        let mut file = File::create(log_path)?;
        file.write_all(ROTATION_MARKER)?;
        file.write_all(&tail[skip..])?;
        Ok(true)
    }
}

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Hands out writers that share one log file handle
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

impl LogWriterFactory {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, op: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        op(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Without `log_file`, logs go to stderr so they never mix with a report on
/// stdout. With one, they are appended to that file, which is truncated to
/// its most recent 1 MB once it grows past 5 MB. `RUST_LOG` overrides
/// `level`.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("ccm={level},ccm_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let Some(log_path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init();
        return Ok(());
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let rotation = RotationPolicy::DEFAULT.apply(log_path);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(LogWriterFactory::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    match rotation {
        Ok(true) => tracing::info!(log_path = %log_path.display(), "log file truncated"),
        Ok(false) => {}
        Err(err) => tracing::warn!(%err, "failed to rotate log file"),
    }
    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(())
}
