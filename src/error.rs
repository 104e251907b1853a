use crate::domain::ports::ErrorInfo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Remote read error: {0}")]
    RemoteReadError(ErrorInfo),
    #[error("Remote write error: {0}")]
    RemoteWriteError(ErrorInfo),
    #[error("A payment submission is already in progress")]
    SubmissionInProgress,
    #[error("Script error on line {line}: {message}")]
    ScriptError { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, PaymentError>;
