use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to bind {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Bad HTTP Request")]
    BadRequest,

    #[error("Method Not Supported: {method}")]
    MethodNotAllowed { method: String },

    #[error("Not Found: {path}")]
    NotFound { path: String },

    #[error("Internal Error: Failed to get file size ({path})")]
    FileReadError { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Request,
    FileSystem,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::BindError { .. } => ErrorCategory::Network,
            SiteError::BadRequest
            | SiteError::MethodNotAllowed { .. }
            | SiteError::UrlError(_) => ErrorCategory::Request,
            SiteError::IoError(_)
            | SiteError::NotFound { .. }
            | SiteError::FileReadError { .. } => ErrorCategory::FileSystem,
            SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::TomlError(_) => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SiteError::BadRequest
            | SiteError::MethodNotAllowed { .. }
            | SiteError::NotFound { .. }
            | SiteError::UrlError(_) => ErrorSeverity::Low,
            SiteError::FileReadError { .. } => ErrorSeverity::Medium,
            SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::TomlError(_) => ErrorSeverity::High,
            SiteError::IoError(_) | SiteError::BindError { .. } => ErrorSeverity::Critical,
        }
    }

    /// HTTP status line pieces for errors raised while serving a request.
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            SiteError::BadRequest | SiteError::UrlError(_) => (400, "Bad HTTP Request"),
            SiteError::MethodNotAllowed { .. } => (405, "Method Not Supported"),
            SiteError::NotFound { .. } => (404, "Not Found"),
            SiteError::FileReadError { .. } => (500, "Internal Error: Failed to get file size"),
            _ => (500, "Internal Server Error"),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::BindError { address, .. } => {
                format!("Could not listen on {}", address)
            }
            SiteError::ConfigError { message } => format!("Configuration problem: {}", message),
            SiteError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            SiteError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Pick another port or stop the process already using it",
            ErrorCategory::Configuration => "Check the command line flags and site.toml",
            ErrorCategory::FileSystem => "Check that the site root exists and is readable",
            ErrorCategory::Request => "Check the request sent by the client",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
