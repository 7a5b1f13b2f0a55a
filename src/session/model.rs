use serde::{Deserialize, Serialize};

/// Locally persisted proof of authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn new(user_id: Option<String>, token: Option<String>) -> Self {
        Self { user_id, token }.normalized()
    }

    /// Blank strings count as absent
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            user_id: keep(self.user_id),
            token: keep(self.token),
        }
    }

    /// A session is present when it carries an identifier or a token
    pub fn is_present(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.user_id) || set(&self.token)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Profile fields cached next to the session after login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProfile {
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence() {
        assert!(!Session::default().is_present());
        assert!(Session::new(Some("42".into()), None).is_present());
        assert!(Session::new(None, Some("abc".into())).is_present());
        assert!(!Session::new(Some("  ".into()), Some(String::new())).is_present());
    }

    #[test]
    fn test_normalized_trims_and_drops_blanks() {
        let session = Session::new(Some(" 42 ".into()), Some("".into()));
        assert_eq!(session.user_id(), Some("42"));
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_wire_names() {
        let session = Session::new(Some("42".into()), Some("abc".into()));
        let text = toml::to_string(&session).unwrap();
        assert!(text.contains("userId = \"42\""));
        assert!(text.contains("token = \"abc\""));
    }
}
