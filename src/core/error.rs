use std::io;

use thiserror::Error;

/// Why a single process record could not be read.
///
/// These never abort a snapshot; the reader substitutes a blank sample.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("process {0} vanished")]
    Vanished(u32),

    #[error("permission denied reading process {0}")]
    PermissionDenied(u32),

    #[error("malformed record for process {pid}: {what}")]
    Malformed { pid: u32, what: &'static str },

    #[error("I/O error reading process {pid}: {source}")]
    Io {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    pub fn from_io(pid: u32, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ReadError::Vanished(pid),
            io::ErrorKind::PermissionDenied => ReadError::PermissionDenied(pid),
            _ => ReadError::Io { pid, source: err },
        }
    }
}

/// Errors that end the monitoring session.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The terminal could not be put into full-screen mode.
    #[error("failed to initialise terminal: {0}")]
    TerminalInit(#[source] io::Error),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
