use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No company found with slug '{slug}'")]
    CompanyNotFound { slug: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::ApiError(_) => ErrorCategory::Network,
            SearchError::BackendError { .. } | SearchError::CompanyNotFound { .. } => {
                ErrorCategory::Backend
            }
            SearchError::ConfigError { .. }
            | SearchError::ConfigValidationError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SearchError::CsvError(_) | SearchError::SerializationError(_) => ErrorCategory::Data,
            SearchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SearchError::ApiError(_) => ErrorSeverity::Medium,
            SearchError::BackendError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            SearchError::BackendError { .. }
            | SearchError::CompanyNotFound { .. }
            | SearchError::CsvError(_)
            | SearchError::SerializationError(_)
            | SearchError::ConfigError { .. }
            | SearchError::ConfigValidationError { .. }
            | SearchError::InvalidConfigValueError { .. }
            | SearchError::MissingConfigError { .. } => ErrorSeverity::High,
            SearchError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether retrying the same command later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SearchError::ApiError(_) => {
                "Check your network connection and the backend URL, then retry".to_string()
            }
            SearchError::BackendError { status: 401, .. }
            | SearchError::BackendError { status: 403, .. } => {
                "Check that the anon key is valid for this project".to_string()
            }
            SearchError::BackendError { status, .. } if *status >= 500 => {
                "The backend is having trouble; retry in a moment".to_string()
            }
            SearchError::BackendError { .. } => {
                "Check the table names in the [backend] section".to_string()
            }
            SearchError::CompanyNotFound { .. } => {
                "Run `host-search search` to list valid slugs".to_string()
            }
            SearchError::ConfigError { .. }
            | SearchError::ConfigValidationError { .. }
            | SearchError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
            SearchError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or environment", field)
            }
            SearchError::IoError(_) => "Check file paths and permissions".to_string(),
            SearchError::CsvError(_) | SearchError::SerializationError(_) => {
                "The backend returned data in an unexpected shape".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the backend: {}", self),
            ErrorCategory::Backend => self.to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
