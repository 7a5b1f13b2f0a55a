use std::time::{Duration, Instant};

use crate::constants::{NETWORK_ERROR_MESSAGE, NETWORK_ERROR_TITLE};
use crate::utils::ShelterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    /// Turn an error into what the user gets to read
    ///
    /// Transport failures never show their raw cause; the server's own words
    /// are used for rejected requests.
    pub fn from_error(err: &ShelterError) -> Self {
        let (title, message) = match err {
            ShelterError::Network(_) => (NETWORK_ERROR_TITLE, NETWORK_ERROR_MESSAGE.to_string()),
            ShelterError::Server { message, .. } => ("Error", message.clone()),
            ShelterError::Unauthorized(message) => ("Not authorized", message.clone()),
            ShelterError::Validation(e) => ("Check the form", e.to_string()),
            ShelterError::Session(message) => ("Session", message.clone()),
            ShelterError::Storage(message) => ("Storage", message.clone()),
            ShelterError::Config(message) => ("Configuration", message.clone()),
            ShelterError::Decode(_) => (
                "Error",
                "The server sent a response that could not be read.".to_string(),
            ),
        };
        Self::new(NoticeLevel::Error, title, message)
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.raised_at.elapsed() >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ValidationError;

    #[test]
    fn test_network_errors_use_generic_text() {
        let notice = Notice::from_error(&ShelterError::Network(
            "error trying to connect: tcp connect error".into(),
        ));
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, NETWORK_ERROR_TITLE);
        assert_eq!(notice.message, NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_server_message_is_shown_verbatim() {
        let notice = Notice::from_error(&ShelterError::Server {
            status: 500,
            message: "Animal no encontrado".into(),
        });
        assert_eq!(notice.message, "Animal no encontrado");
    }

    #[test]
    fn test_validation_message() {
        let notice = Notice::from_error(&ValidationError::Required("email").into());
        assert_eq!(notice.message, "email is required");
    }

    #[test]
    fn test_expiry() {
        let notice = Notice::new(NoticeLevel::Info, "Hi", "there");
        assert!(!notice.is_expired(Duration::from_secs(60)));
        assert!(notice.is_expired(Duration::ZERO));
    }
}
