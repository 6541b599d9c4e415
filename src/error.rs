use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
    #[error("ExportError: {0}")]
    Export(#[from] ExportError),
    #[error("ServiceError: {0}")]
    Service(#[from] ServiceError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Unknown statistic card: {title}")]
    UnknownStatistic { title: String },
    #[error("Interactive input failed: {0}")]
    Input(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Terminal output error: {0}")]
    TerminalOutput(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    EmptyDataset,
    #[error("Failed to serialize export: {message}")]
    Serialization { message: String },
    #[error("Failed to write export file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, hint: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Not found: {resource_type} '{key}'")]
    NotFound { resource_type: String, key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Display(_) => ErrorSeverity::Low,
            AppError::Export(ExportError::EmptyDataset) => ErrorSeverity::Low,
            AppError::Export(_) => ErrorSeverity::Medium,
            AppError::Service(ServiceError::Api(ApiError::Unauthorized { .. })) => {
                ErrorSeverity::High
            }
            AppError::Service(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                "The inventory server rejected the credentials".to_string()
            }
            AppError::Config(ConfigError::MissingField { field, .. }) => {
                format!("Configuration value '{}' is not set", field)
            }
            AppError::Export(ExportError::EmptyDataset) => "No data to export".to_string(),
            AppError::Service(ServiceError::NotFound { resource_type, key }) => {
                format!("{} '{}' not found", resource_type, key)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. })
            | AppError::Service(ServiceError::Api(ApiError::Unauthorized { .. })) => Some(
                "Set a valid token with COMPINV_TOKEN or 'compinv config set token <value>'"
                    .to_string(),
            ),
            AppError::Config(ConfigError::MissingField { hint, .. }) => Some(hint.clone()),
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your network connection to the inventory server".to_string())
            }
            AppError::Cli(CliError::UnknownStatistic { .. }) => {
                Some("'compinv stats' lists the available statistic cards".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let cli_err = CliError::InvalidArguments("invalid arguments".to_string());
        assert_eq!(
            format!("{}", cli_err),
            "Invalid arguments: invalid arguments"
        );

        let cli_err = CliError::UnknownStatistic {
            title: "Мониторы".to_string(),
        };
        assert_eq!(format!("{}", cli_err), "Unknown statistic card: Мониторы");
    }

    #[test]
    fn test_api_error_endpoint() {
        let api_err = ApiError::Timeout {
            timeout_secs: 10,
            endpoint: "/all_compyuters/".to_string(),
        };
        assert_eq!(api_err.endpoint(), "/all_compyuters/");

        let api_err = ApiError::Http {
            status: 500,
            endpoint: "/filter-options/".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(api_err.endpoint(), "/filter-options/");
        assert_eq!(format!("{}", api_err), "HTTP error: 500 boom");
    }

    #[test]
    fn test_export_error_display() {
        assert_eq!(format!("{}", ExportError::EmptyDataset), "No data to export");

        let err = ExportError::Serialization {
            message: "bad cell".to_string(),
        };
        assert_eq!(format!("{}", err), "Failed to serialize export: bad cell");
    }

    #[test]
    fn test_severity_mapping() {
        let app_err = AppError::Api(ApiError::Unauthorized {
            status: 401,
            endpoint: "endpoint".to_string(),
            server_message: "message".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Api(ApiError::Http {
            status: 502,
            endpoint: "endpoint".to_string(),
            message: "bad gateway".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);

        let app_err = AppError::Api(ApiError::Http {
            status: 400,
            endpoint: "endpoint".to_string(),
            message: "bad request".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::Medium);

        let app_err = AppError::Export(ExportError::EmptyDataset);
        assert_eq!(app_err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_service_error_display() {
        let service_err = ServiceError::NotFound {
            resource_type: "Computer".to_string(),
            key: "pc-01".to_string(),
        };
        assert_eq!(format!("{}", service_err), "Not found: Computer 'pc-01'");
    }

    #[test]
    fn test_troubleshooting_hints() {
        let app_err = AppError::Config(ConfigError::MissingField {
            field: "url".to_string(),
            hint: "compinv config set url <value>".to_string(),
        });
        assert_eq!(
            app_err.troubleshooting_hint(),
            Some("compinv config set url <value>".to_string())
        );
        assert_eq!(
            app_err.display_friendly(),
            "Configuration value 'url' is not set"
        );

        let app_err = AppError::Display(DisplayError::TerminalOutput("x".to_string()));
        assert!(app_err.troubleshooting_hint().is_none());
    }
}
