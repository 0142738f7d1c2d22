//! Error types for question dispatch.

/// Errors raised while a rule works on a question.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No CSV file found in the zip")]
    NoCsvFile,
    #[error("No '{0}' column found in the CSV")]
    MissingColumn(String),
    #[error("CSV file has no data rows")]
    EmptyCsv,
    #[error("Archive expands to more than {0} bytes")]
    ArchiveTooLarge(u64),
    #[error("Invalid archive: {0}")]
    Archive(String),
    #[error("CSV parse failed: {0}")]
    Csv(String),
    #[error("File is not valid UTF-8: {0}")]
    Decode(String),
    #[error("Interpreter unavailable: {0}")]
    InterpreterUnavailable(String),
    #[error("Code execution failed: {0}")]
    Execution(String),
    #[error("Code execution timed out after {0} seconds")]
    Timeout(u64),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for DispatchError {
    fn from(err: zip::result::ZipError) -> Self {
        DispatchError::Archive(err.to_string())
    }
}

impl From<csv::Error> for DispatchError {
    fn from(err: csv::Error) -> Self {
        DispatchError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_display() {
        assert_eq!(
            DispatchError::NoCsvFile.to_string(),
            "No CSV file found in the zip"
        );
        assert_eq!(
            DispatchError::MissingColumn("answer".to_string()).to_string(),
            "No 'answer' column found in the CSV"
        );
        assert_eq!(
            DispatchError::ArchiveTooLarge(1024).to_string(),
            "Archive expands to more than 1024 bytes"
        );
        assert_eq!(
            DispatchError::Timeout(10).to_string(),
            "Code execution timed out after 10 seconds"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DispatchError = io_err.into();
        assert!(matches!(err, DispatchError::Io(_)));
    }
}
