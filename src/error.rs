//! Error types used across the application.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or parsing `config.txt`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file (or the executable's directory) could not be read
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A non-comment, non-blank line without a `=` separator
    #[error("invalid config line {line}: {content:?}")]
    Format { line: usize, content: String },

    /// A required key is absent
    #[error("missing required config key {0}")]
    MissingKey(&'static str),
}

/// Errors raised while talking to the Steam Web API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 401, almost always a wrong API key
    #[error("Steam API rejected the request, the API key is probably incorrect")]
    Unauthorized,

    /// Any other non-success status
    #[error("Steam API returned {0}")]
    Status(reqwest::StatusCode),

    /// Transport failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The body was not the expected JSON
    #[error("could not decode Steam API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while scanning the local library folder.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not read library folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors raised when handing a game off to Steam.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Io(#[from] io::Error),
}
