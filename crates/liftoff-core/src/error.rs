use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Section {index} out of range (sequence has {count} sections)")]
    InvalidSection { index: usize, count: usize },

    #[error("Driver '{driver}' failed: {message}")]
    Driver { driver: String, message: String },

    #[error("Asset '{name}' unavailable: {message}")]
    Asset { name: String, message: String },

    #[error("Physics error: {0}")]
    Physics(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
