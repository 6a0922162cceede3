//! Error types and exit codes for the command-line front end.

/// Process exit codes.
pub mod exit_codes {
    /// Internal, I/O or encoding failure.
    pub const FAILURE: i32 = 1;
    /// Caller input was rejected (bad threshold, regions, image, format).
    pub const INVALID_INPUT: i32 = 2;
    /// `--fail-above` gate tripped.
    pub const DIFF_ABOVE_LIMIT: i32 = 3;
}

/// All errors that can occur in the CLI.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Diff error: {0}")]
    Diff(#[from] visual_diff::DiffError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ignore_regions: {0}")]
    InvalidRegions(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        use exit_codes::*;
        match self {
            CliError::Diff(_)
            | CliError::Image(_)
            | CliError::InvalidRegions(_)
            | CliError::InvalidThreshold(_)
            | CliError::InvalidInput(_)
            | CliError::UnsupportedFormat(_) => INVALID_INPUT,
            CliError::Io(_) | CliError::Json(_) => FAILURE,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
