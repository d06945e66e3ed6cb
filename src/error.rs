use std::fmt;
use std::io;

/// Error type for the Turing Smart Screen core driver.
///
/// Mirrors the hand-rolled `UsbAsyncError` pattern from `libusb-async`:
/// a small enum with manual `Display`/`Error`/`From` impls rather than a
/// derive-macro error crate, since nothing in this core needs more than
/// that.
#[derive(Debug)]
pub enum TuringError {
    /// No device matching vendor 0x1CBE / product 0x0088 was found.
    DeviceAbsent,
    /// A USB transaction failed at the transport layer.
    Transport(io::Error),
    /// A device reply was too short or otherwise malformed to parse.
    ProtocolMismatch(String),
    /// The caller passed a file extension outside the supported set.
    UnsupportedFileType(String),
    /// An external collaborator (ffmpeg, image codec) failed.
    Adapter(String),
    /// Local filesystem I/O failed.
    Io(io::Error),
}

impl fmt::Display for TuringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuringError::DeviceAbsent => write!(f, "Turing Smart Screen device not found"),
            TuringError::Transport(err) => write!(f, "USB transport error: {err}"),
            TuringError::ProtocolMismatch(msg) => write!(f, "protocol mismatch: {msg}"),
            TuringError::UnsupportedFileType(ext) => {
                write!(f, "unsupported file type: {ext}")
            }
            TuringError::Adapter(msg) => write!(f, "adapter failure: {msg}"),
            TuringError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for TuringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuringError::Transport(err) => Some(err),
            TuringError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusb::Error> for TuringError {
    fn from(err: rusb::Error) -> Self {
        match err {
            rusb::Error::NoDevice | rusb::Error::NotFound => TuringError::DeviceAbsent,
            other => TuringError::Transport(io::Error::new(io::ErrorKind::Other, other)),
        }
    }
}

impl From<io::Error> for TuringError {
    fn from(err: io::Error) -> Self {
        TuringError::Io(err)
    }
}

impl From<TuringError> for io::Error {
    fn from(err: TuringError) -> Self {
        match err {
            TuringError::DeviceAbsent => {
                io::Error::new(io::ErrorKind::NotFound, "device not found")
            }
            TuringError::Transport(err) => err,
            TuringError::Io(err) => err,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TuringError>;
