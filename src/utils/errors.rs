use thiserror::Error;

/// Main error type for the shelter client
#[derive(Error, Debug)]
pub enum ShelterError {
    /// No response reached us from the server
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a 4xx/5xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The server answered 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl ShelterError {
    /// True when the request never got an answer from the server
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// True for failures detected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for ShelterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        match err.status() {
            Some(status) if status.as_u16() == 401 => Self::Unauthorized(err.to_string()),
            Some(status) => Self::Server {
                status: status.as_u16(),
                message: err.to_string(),
            },
            // connect, timeout, request building, redirect loops: nothing usable came back
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ShelterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Client-side form validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ShelterError>;
