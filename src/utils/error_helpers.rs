use crate::error::{ApiError, DisplayError, ExportError};
use std::io;

/// Helper functions for standardizing error conversions across the codebase
/// Convert reqwest transport errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout {
            timeout_secs,
            endpoint: endpoint.to_string(),
        };
    }

    ApiError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: reqwest::Error, status: u16, endpoint: &str) -> ApiError {
    ApiError::Http {
        status,
        endpoint: endpoint.to_string(),
        message: format!("Failed to parse response: {}", error),
    }
}

/// Convert IO errors to DisplayError for terminal operations
pub fn convert_io_to_display_error(error: io::Error, operation: &str) -> DisplayError {
    DisplayError::TerminalOutput(format!("{}: {}", operation, error))
}

/// Convert csv writer errors to ExportError
pub fn convert_csv_error(error: csv::Error) -> ExportError {
    ExportError::Serialization {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_io_to_display_error() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let converted = convert_io_to_display_error(err, "flush stdout");
        assert_eq!(
            format!("{}", converted),
            "Terminal output error: flush stdout: pipe closed"
        );
    }

    #[test]
    fn test_convert_csv_error() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let converted = convert_csv_error(csv::Error::from(io_err));
        assert!(matches!(converted, ExportError::Serialization { .. }));
        assert!(format!("{}", converted).contains("disk full"));
    }
}
