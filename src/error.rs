#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config key '{0}'")]
    InvalidConfigKey(String),

    #[error("invalid config value for '{key}': {msg}")]
    InvalidConfigValue { key: String, msg: String },

    #[error("unknown color '{0}' (expected a palette name, hex value or 1-7)")]
    UnknownColor(String),

    #[error("replay line {line}: {msg}")]
    Replay { line: usize, msg: String },

    #[error("interactive session requires a TTY")]
    NotATty,

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("io error at {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
