use thiserror::Error;

/// A fetch that did not produce a usable page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("request to {url} timed out after {millis}ms")]
    Timeout { url: String, millis: u64 },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// The markup did not have the shape the extraction rules expect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPageError {
    #[error("listing block has {found} anchors, title-and-link anchor #{wanted} is missing")]
    MissingTitleAnchor { found: usize, wanted: usize },

    #[error("title-and-link anchor has no usable http(s) href")]
    MissingHref,

    #[error("title-and-link anchor has no visible text")]
    EmptyTitle,

    #[error("details page has {found} details columns, posted-on column #{wanted} is missing")]
    MissingDetailsColumn { found: usize, wanted: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse date '{input}': {reason}")]
pub struct DateParseError {
    pub input: String,
    pub reason: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("{channel} request failed: {message}")]
    Transport { channel: String, message: String },

    #[error("{channel} rejected the message with status {status}: {body}")]
    Rejected {
        channel: String,
        status: u16,
        body: String,
    },

    #[error("invalid {channel} address '{address}': {reason}")]
    InvalidAddress {
        channel: String,
        address: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("listing page fetch failed: {0}")]
    PrimaryFetch(#[from] TransportError),
}

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlertError::ConfigError { .. }
            | AlertError::MissingConfigError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            AlertError::Pipeline(_) => ErrorCategory::Network,
            AlertError::Notify(_) => ErrorCategory::Notification,
            AlertError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Notification => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AlertError::Pipeline(PipelineError::PrimaryFetch(TransportError::Timeout { .. })) => {
                "The listing site is slow; raise source.timeout_seconds or try again later"
            }
            AlertError::Pipeline(PipelineError::PrimaryFetch(TransportError::Status { .. })) => {
                "Check that source.url still points at a live listing page"
            }
            AlertError::Pipeline(_) => "Check network connectivity and the source.url setting",
            AlertError::Notify(NotifyError::InvalidAddress { .. }) => {
                "Check the recipient and sender addresses in the [alert] and [notifier] tables"
            }
            AlertError::Notify(_) => "Check the notifier credentials; the scrape itself succeeded",
            AlertError::MissingConfigError { .. } => {
                "Add the missing setting to the config file or environment"
            }
            AlertError::ConfigError { .. }
            | AlertError::InvalidConfigValueError { .. }
            | AlertError::ConfigValidationError { .. } => "Fix the configuration and run again",
            AlertError::IoError(_) => "Check that the config file exists and is readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not load the listing page: {}", self),
            ErrorCategory::Notification => format!("Could not deliver the alert: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
