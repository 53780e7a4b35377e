use thiserror::Error;

/// Network-level failure talking to the portal. Never a status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("portal request timed out")]
    Timeout,

    #[error("could not connect to portal: {message}")]
    Connect { message: String },

    #[error("portal response body could not be read: {message}")]
    Body { message: String },

    #[error("portal request failed: {message}")]
    Request { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect { message }
        } else if err.is_body() || err.is_decode() {
            TransportError::Body { message }
        } else {
            TransportError::Request { message }
        }
    }
}

/// The two outcomes of a resolution that are not a permit status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid tracking code '{code}': {reason}")]
    InvalidCode { code: String, reason: String },

    #[error("status lookup failed: {source}")]
    LookupFailed {
        #[from]
        source: TransportError,
    },
}

impl ResolveError {
    /// Lookup failures may succeed later; a malformed code never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::LookupFailed { .. })
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::Resolve(ResolveError::InvalidCode { .. }) => ErrorCategory::UserInput,
            TrackerError::Resolve(ResolveError::LookupFailed { .. }) => ErrorCategory::Network,
            TrackerError::ConfigParseError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TrackerError::IoError(_) | TrackerError::HttpClientError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::Resolve(ResolveError::InvalidCode { .. }) => {
                "Send a 6-digit or 10-character alphanumeric code, e.g. 26BO123456 or 123456"
            }
            TrackerError::Resolve(ResolveError::LookupFailed { .. }) => {
                "The Polizia di Stato portal may be down; try again in a few minutes"
            }
            TrackerError::ConfigParseError { .. } => "Check the TOML syntax of the config file",
            TrackerError::InvalidConfigValueError { .. } => {
                "Fix the reported field in the config file or command line"
            }
            TrackerError::MissingConfigError { .. } => "Add the missing field to the config file",
            TrackerError::IoError(_) => "Make sure the file exists and is readable",
            TrackerError::HttpClientError(_) => "Check the TLS and proxy settings of this host",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::Resolve(ResolveError::InvalidCode { code, .. }) => {
                format!("'{}' doesn't look like a permit code", code)
            }
            TrackerError::Resolve(ResolveError::LookupFailed { .. }) => {
                "Could not reach the Polizia di Stato server".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
