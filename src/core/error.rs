//! Error types for BSM Options

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BsmError {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Insufficient data: {observations} price points, at least {required} required")]
    InsufficientData { observations: usize, required: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid side: {0:?} (expected C, P or B)")]
    InvalidSide(String),

    #[error("Data provider error: {0}")]
    DataProvider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(#[source] csv::Error),
}

pub type BsmResult<T> = Result<T, BsmError>;

/// Discriminant of [`BsmError`], stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDateFormat,
    InsufficientData,
    DegenerateInput,
    InvalidSide,
    DataProvider,
    InvalidInput,
    Config,
    IO,
    Serialization,
    Csv,
}

impl BsmError {
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::DataProvider(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDateFormat(_) => ErrorKind::InvalidDateFormat,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::DegenerateInput(_) => ErrorKind::DegenerateInput,
            Self::InvalidSide(_) => ErrorKind::InvalidSide,
            Self::DataProvider(_) => ErrorKind::DataProvider,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
            Self::IO(_) => ErrorKind::IO,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Csv(_) => ErrorKind::Csv,
        }
    }

    /// Process exit code for this error kind.
    ///
    /// 1 is reserved for a batch that finished with failed rows and 2 for
    /// command-line usage errors.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidInput => 3,
            ErrorKind::InvalidDateFormat => 4,
            ErrorKind::InsufficientData => 5,
            ErrorKind::DegenerateInput => 6,
            ErrorKind::InvalidSide => 7,
            ErrorKind::DataProvider => 8,
            ErrorKind::Config => 9,
            ErrorKind::IO => 10,
            ErrorKind::Serialization => 11,
            ErrorKind::Csv => 12,
        }
    }
}

/// Read failures surface as `IO`; everything else the reader rejects is `Csv`
impl From<csv::Error> for BsmError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            Self::IO(std::io::Error::from(e))
        } else {
            Self::Csv(e)
        }
    }
}

impl From<serde_json::Error> for BsmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
