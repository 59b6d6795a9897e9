//! Error types for cnobi-driver.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration and output operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[derive(Error, Debug, miette::Diagnostic)]
pub enum DriverError {
    /// Failed to read configuration file.
    #[error("Failed to read config file: {0}")]
    #[diagnostic(code(cnobi::config::read))]
    ReadConfig(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    #[diagnostic(code(cnobi::config::toml))]
    ParseToml(#[from] toml::de::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    #[diagnostic(code(cnobi::output::write))]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output path has no file name to derive a default from.
    #[error("Cannot derive an output path from {}", .0.display())]
    #[diagnostic(code(cnobi::output::path), help("pass an explicit OUTPUT argument"))]
    NoOutputPath(PathBuf),
}
