//! Error types shared across the crate.
//!
//! The split follows how each failure is treated during a run:
//!
//! - [`ConfigError`] is fatal and raised before any repository is touched.
//! - [`LocateError`] is fatal and only raised when the root cannot be read.
//! - [`RemoteError`] and [`CredentialError`] are per-repository; the caller
//!   reports them and moves on to the next repository.
//!
//! None of the messages include token values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or compiling the replacement configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {0} must contain a JSON object")]
    NotAnObject(PathBuf),

    /// The token for `pattern` is not a JSON string.
    #[error("token for pattern `{0}` must be a string")]
    TokenNotString(String),

    #[error("fail to compile regex `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no replacement rules configured")]
    NoRules,
}

/// The repositories root could not be listed.
#[derive(Debug, Error)]
#[error("cannot read repositories dir {path}: {source}")]
pub struct LocateError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reading or writing a repository's origin URL failed.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No config file, no `[remote "origin"]` section, or no `url` key.
    #[error("no origin remote configured in {0}")]
    NotFound(PathBuf),

    /// libgit2 could not read or write the config file.
    #[error("cannot access {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// The external `git` invocation failed; holds its trimmed stderr.
    #[error("git failed: {0}")]
    Command(String),
}

/// A remote URL could not be given new credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unparseable remote url: {0}")]
    Parse(#[from] url::ParseError),

    /// URLs such as `file:` or `mailto:` cannot carry userinfo.
    #[error("remote url cannot carry credentials")]
    CannotHaveCredentials,
}
