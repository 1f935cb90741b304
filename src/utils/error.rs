use thiserror::Error;

/// Main error type for csvql
#[derive(Debug, Error)]
pub enum CsvqlError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
}

/// Structural query failures. These abort the whole `execute` call and
/// propagate to the caller; anything softer degrades to an empty or
/// partial result instead.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query exceeds maximum length of {max} bytes (got {len})")]
    TooLong { len: usize, max: usize },

    #[error("Unsupported statement: {0}")]
    Unsupported(String),

    #[error("Malformed query: {0}")]
    Malformed(String),
}

/// Loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Evaluation-time anomalies. Never surfaced to the caller: the
/// executor logs these at debug level and treats the row as a
/// non-match, so a bad WHERE clause yields zero rows rather than an
/// error.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("No comparison operator found in '{0}'")]
    UnparsableComparison(String),

    #[error("LIKE pattern must be a quoted string, got '{0}'")]
    UnquotedLikePattern(String),

    #[error("Invalid LIKE pattern '{0}'")]
    InvalidLikePattern(String),
}

/// Result type alias for csvql operations
pub type CsvqlResult<T> = Result<T, CsvqlError>;
