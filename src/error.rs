use thiserror::Error;

use crate::excel::ExcelError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No input files to process")]
    NoInputs,

    #[error(transparent)]
    Excel(#[from] ExcelError),

    #[error("Configuration error")]
    Config(#[from] ConfigError),

    #[error("Invalid input pattern for {path}")]
    Pattern {
        path: String,
        #[source]
        source: glob::PatternError,
    },
}
