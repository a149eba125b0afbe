//! Error type for the service layer (tuning, level files, saves)
//!
//! The simulation itself never fails; only the collaborators that touch
//! files or parse data return these.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Filesystem failure
    Io(std::io::Error),
    /// Malformed JSON
    Json(serde_json::Error),
    /// Named save/level does not exist
    NotFound(String),
    /// Save written by a newer format version
    UnsupportedVersion(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::NotFound(name) => write!(f, "not found: {name}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported save version {v}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotFound(_) | Self::UnsupportedVersion(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
