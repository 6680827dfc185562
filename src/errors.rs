/*!
 * Error types for the tmdbdump application.
 *
 * Upstream call failures, per-entity pipeline failures and run-fatal
 * application errors are kept apart so that only the last kind ever stops
 * a download run.
 */

use thiserror::Error;

use crate::dump::failure_log::FailureStage;

/// Errors that can occur when calling the media database API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-200 answer from the API
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl ProviderError {
    /// HTTP status code when the API answered with something other than 200
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Failure of a single entity's fetch-merge-assemble-write sequence.
///
/// Never fatal to a run: the scheduler records it in the failure log and
/// moves on to the next entity.
#[derive(Error, Debug)]
pub enum EntityError {
    /// A sub-resource request answered with a non-200 status
    #[error("{stage} request returned HTTP {status_code}")]
    Status {
        /// Pipeline stage that was being fetched
        stage: FailureStage,
        /// HTTP status code
        status_code: u16,
    },

    /// Transport or decoding failure while talking to the API
    #[error("{0}")]
    Upstream(ProviderError),

    /// A payload lacked an expected field or had the wrong shape
    #[error("Malformed payload: {0}")]
    Data(String),

    /// The document could not be written
    #[error("File error: {0}")]
    File(String),
}

impl EntityError {
    /// Classify a provider error raised while fetching `stage`.
    pub fn at_stage(stage: FailureStage, error: ProviderError) -> Self {
        match error.status_code() {
            Some(status_code) => Self::Status { stage, status_code },
            None => Self::Upstream(error),
        }
    }

    /// Stage tag written to the failure log
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Status { stage, .. } => *stage,
            _ => FailureStage::Exception,
        }
    }

    /// Detail written to the failure log: the status code, or the error text
    pub fn detail(&self) -> String {
        match self {
            Self::Status { status_code, .. } => status_code.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the failing worker should pause before returning
    pub fn is_exception(&self) -> bool {
        self.stage() == FailureStage::Exception
    }
}

impl From<std::io::Error> for EntityError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for EntityError {
    fn from(error: serde_json::Error) -> Self {
        Self::Data(error.to_string())
    }
}

/// Main application error type, for failures that stop the whole run
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the media database API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
