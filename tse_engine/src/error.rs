//! Error types for the TSE engine
//!
//! This module defines the error types used throughout the engine,
//! including device access, asset parsing, shader building and initialization.

use std::fmt;

/// Result type for TSE engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// TSE engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL driver, surface, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (render context, device state)
    InitializationFailed(String),

    /// Asset file missing, truncated or malformed
    AssetError(String),

    /// Shader stage compilation or program link failure
    ShaderError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::AssetError(msg) => write!(f, "Asset error: {}", msg),
            Error::ShaderError(msg) => write!(f, "Shader error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::AssetError(err.to_string())
    }
}

// ===== ERROR MACROS =====

/// Log an ERROR (with file:line) and return `Err(Error::BackendError(..))`
///
/// # Example
///
/// ```no_run
/// # use tse_engine::engine_bail;
/// # fn f() -> tse_engine::tse::Result<()> {
/// engine_bail!("tse::Buffer", "Buffer slot {} out of range", 99);
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::tse::Error::BackendError(message));
    }};
}

/// Log an ERROR (with file:line) and evaluate to `Error::BackendError(..)`
///
/// Used in `map_err` / `ok_or_else` closures where an early return is not possible.
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::tse::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
