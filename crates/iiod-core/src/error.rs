//! Error taxonomy for the daemon core.
//!
//! One enum covers both the structural failures reported synchronously to a
//! caller (device lookup, argument validation, thread spawn) and the runtime
//! failures a reader task delivers through a subscriber's completion status
//! (device read, sink write). Every variant maps onto a POSIX errno so the
//! wire framing can render the numeric status lines clients expect, and the
//! `Display` text is the platform's `strerror(3)` description, which is what
//! verbose clients see after the `ERROR:` prefix.

use thiserror::Error;

/// Convenience alias for results using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the command dispatcher and the streaming engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested id/name does not resolve in the device context.
    #[error("{}", strerror(libc::ENODEV))]
    NoDevice,

    /// Sample-size mismatch against an existing subscriber set, or an
    /// argument outside the accepted range.
    #[error("{}", strerror(libc::EINVAL))]
    InvalidArgument,

    /// Buffer allocation failed.
    #[error("{}", strerror(libc::ENOMEM))]
    OutOfMemory,

    /// The device rejected `open`.
    #[error("{}", strerror(*errno))]
    DeviceOpen { errno: i32 },

    /// A hardware read returned an error.
    #[error("{}", strerror(*errno))]
    DeviceRead { errno: i32 },

    /// Writing to the client sink failed.
    #[error("{}", strerror(*errno))]
    SinkWrite { errno: i32 },

    /// The reader thread could not be launched.
    #[error("{}", strerror(*errno))]
    ThreadSpawn { errno: i32 },

    /// Engine configuration rejected by validation.
    #[error("{0}")]
    Config(String),
}

impl Error {
    /// The positive POSIX error code behind this error.
    pub fn errno(&self) -> i32 {
        match self {
            Error::NoDevice => libc::ENODEV,
            Error::InvalidArgument => libc::EINVAL,
            Error::OutOfMemory => libc::ENOMEM,
            Error::DeviceOpen { errno }
            | Error::DeviceRead { errno }
            | Error::SinkWrite { errno }
            | Error::ThreadSpawn { errno } => *errno,
            Error::Config(_) => libc::EINVAL,
        }
    }

    /// Wrap a sink write failure, preserving the OS error code when present.
    pub fn sink_write(err: &std::io::Error) -> Self {
        Error::SinkWrite {
            errno: err.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}

/// Platform description for an errno, as `strerror(3)` renders it.
pub fn strerror(errno: i32) -> String {
    let mut buf = [0 as libc::c_char; 128];
    let rc = unsafe { libc::strerror_r(errno, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return format!("Unknown error {errno}");
    }
    let text = unsafe { std::ffi::CStr::from_ptr(buf.as_ptr()) };
    text.to_string_lossy().into_owned()
}
