//! Error types for configuration loading and raster extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Error loading or writing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Error turning a projected crop into pixels.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The projected geometry contains zero, negative or non-finite values.
    #[error("degenerate crop geometry: {0}")]
    DegenerateGeometry(String),

    /// The crop rectangle does not overlap the rotated image.
    #[error("crop region is empty")]
    EmptyRegion,

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type RasterResult<T> = Result<T, RasterError>;
