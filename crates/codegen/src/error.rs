use schemaforge_core::error::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Config file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
