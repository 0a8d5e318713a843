//! Access log writer
//!
//! Thread-safe line writer targeting stdout or an append-mode file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global access log writer
static ACCESS_WRITER: OnceLock<AccessWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    File(Mutex<File>),
}

pub struct AccessWriter {
    target: LogTarget,
}

impl AccessWriter {
    fn new(path: Option<&str>) -> io::Result<Self> {
        let target = match path {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };
        Ok(Self { target })
    }

    pub fn write_line(&self, message: &str) {
        match &self.target {
            LogTarget::Stdout => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{message}");
            }
            LogTarget::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global access writer
///
/// Returns an error if the file cannot be opened or if called twice.
pub fn init(path: Option<&str>) -> io::Result<()> {
    let writer = AccessWriter::new(path)?;
    ACCESS_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Access log writer already initialized",
        )
    })
}

/// Write one access log line; falls back to stdout before `init`
pub fn write_access(message: &str) {
    match ACCESS_WRITER.get() {
        Some(writer) => writer.write_line(message),
        None => println!("{message}"),
    }
}
