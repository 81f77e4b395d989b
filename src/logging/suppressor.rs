//! Log sink that drops unwanted log lines before they hit the log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Append-only log writer with line suppression.
///
/// Every write is split on `line_prefix`; a segment containing any of the
/// `suppress` substrings is dropped. The prefix itself is consumed by the
/// split and is not written back.
///
/// With an empty filename nothing is filtered and writes go straight to
/// the process's standard input descriptor.
pub struct LogSuppressor {
    filename: PathBuf,
    suppress: Vec<String>,
    line_prefix: String,
    log_file: Mutex<Option<File>>,
}

impl LogSuppressor {
    pub fn new<P: Into<PathBuf>>(filename: P, suppress: Vec<String>, line_prefix: &str) -> Self {
        Self {
            filename: filename.into(),
            suppress,
            line_prefix: line_prefix.to_string(),
            log_file: Mutex::new(None),
        }
    }

    fn is_passthrough(&self) -> bool {
        self.filename.as_os_str().is_empty()
    }

    /// Opens the log file for appending, creating it with mode 0600.
    pub fn open(&self) -> io::Result<()> {
        if self.is_passthrough() {
            return Ok(());
        }

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.filename)?;

        *self.lock() = Some(file);
        Ok(())
    }

    /// Flushes and releases the log file.
    pub fn close(&self) -> io::Result<()> {
        if self.is_passthrough() {
            return Ok(());
        }

        match self.lock().take() {
            Some(file) => file.sync_all(),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "log file is not open")),
        }
    }

    /// Returns `buf` with every suppressed segment removed.
    pub fn filter(&self, buf: &[u8]) -> String {
        let text = String::from_utf8_lossy(buf);
        text.split(self.line_prefix.as_str())
            .filter(|line| !self.suppress.iter().any(|s| line.contains(s.as_str())))
            .collect()
    }

    /// Filters `buf` and appends the remainder to the log file in one write.
    ///
    /// Returns the number of bytes persisted, which is usually less than
    /// `buf.len()`.
    pub fn write_filtered(&self, buf: &[u8]) -> io::Result<usize> {
        if self.is_passthrough() {
            return write_passthrough(buf);
        }

        let mut guard = self.lock();
        let output = self.filter(buf);
        match guard.as_mut() {
            Some(file) => {
                file.write_all(output.as_bytes())?;
                Ok(output.len())
            }
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "log file is not open")),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<File>> {
        // A panic while holding the lock leaves the file handle itself intact.
        self.log_file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(unix)]
fn write_passthrough(buf: &[u8]) -> io::Result<usize> {
    use std::os::fd::AsFd;

    // Descriptor 0: the passthrough target is stdin.
    let fd = io::stdin().as_fd().try_clone_to_owned()?;
    File::from(fd).write(buf)
}

#[cfg(not(unix))]
fn write_passthrough(buf: &[u8]) -> io::Result<usize> {
    io::stderr().write(buf)
}

/// Reports the whole buffer as consumed so `write_all` callers never resubmit
/// the suppressed part; use [`LogSuppressor::write_filtered`] for the number
/// of bytes actually persisted.
impl Write for &LogSuppressor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_passthrough() {
            return write_passthrough(buf);
        }
        self.write_filtered(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Write for LogSuppressor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}
