//! File mirror for log output
//!
//! One file per day under `logs/`, appended through a buffered writer.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

const LOG_DIR: &str = "logs";

static FILE_WRITER: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));

pub fn init_file_logging() {
    let path = log_file_path(Path::new(LOG_DIR));
    if let Err(e) = open_log_file(&path) {
        eprintln!("Failed to open log file {}: {}", path.display(), e);
    }
}

fn log_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("curvepad_{}.log", Local::now().format("%Y-%m-%d")))
}

fn open_log_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    *FILE_WRITER.lock() = Some(BufWriter::new(file));
    Ok(())
}

/// Append a line; no-op until `init_file_logging` succeeded
pub fn write_to_file(line: &str) {
    let mut guard = FILE_WRITER.lock();
    if let Some(writer) = guard.as_mut() {
        if writeln!(writer, "{}", line).is_err() {
            *guard = None;
        }
    }
}

pub fn flush_file_logging() {
    if let Some(writer) = FILE_WRITER.lock().as_mut() {
        let _ = writer.flush();
    }
}
