use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcquireError>;

/// Everything that can go wrong while turning a web page or a file into a
/// practice text. None of these are fatal: the current session keeps running.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("could not parse page: {message}")]
    Parse { message: String },

    #[error("no readable content found")]
    NoContentFound,

    #[error("fetch failed: {message}")]
    Fetch { message: String },

    #[error("file is empty")]
    EmptyContent,

    #[error("could not read file: {message}")]
    Read { message: String },

    #[error("only .txt files are supported: {path}")]
    UnsupportedFile { path: PathBuf },
}

impl AcquireError {
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AcquireError {
    fn from(err: reqwest::Error) -> Self {
        Self::fetch(err.to_string())
    }
}

impl From<std::io::Error> for AcquireError {
    fn from(err: std::io::Error) -> Self {
        Self::read(err.to_string())
    }
}
