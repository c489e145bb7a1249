use thiserror::Error;

/// Convenience result type for loading, cleaning and export operations.
pub type CleanerResult<T> = Result<T, CleanerError>;

/// Error type returned by the loader, codec, export adapter and session.
///
/// The imputation engine itself is total and never produces one of these.
#[derive(Debug, Error)]
pub enum CleanerError {
    /// Underlying I/O error (e.g. file not found, permission denied, invalid UTF-8).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error while serializing a dataset.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The caller supplied an unusable selection (wrong file count, unsupported extension, ...).
    #[error("invalid input: {message}")]
    UserInput { message: String },

    /// The content could not be turned into a dataset (e.g. no header line).
    #[error("failed to parse dataset: {message}")]
    Parse { message: String },

    /// A clean operation is already in flight for this session.
    #[error("a clean operation is already in progress")]
    Busy,
}

impl CleanerError {
    pub(crate) fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput {
            message: message.into(),
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
