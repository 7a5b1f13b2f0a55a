use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::ApiConfig;
use crate::constants::{GENERIC_SERVER_ERROR, INVALID_CREDENTIALS, RELOGIN_HINT, UNAUTHORIZED_HINT};
use crate::session::GateView;
use crate::utils::{Result, ShelterError};

/// REST client for the shelter backend
///
/// Reads the bearer token from the auth gate on every request, so a login or
/// logout is picked up without rebuilding the client.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    login_path: String,
    session: GateView,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: GateView) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ShelterError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ShelterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            login_path: config.login_path.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn login_path(&self) -> &str {
        &self.login_path
    }

    /// User id of the current session, required by the profile endpoints
    pub(crate) fn current_user_id(&self) -> Result<String> {
        self.session
            .user_id()
            .ok_or_else(|| ShelterError::Session("no user id in the current session".to_string()))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, path).json(body), path)
            .await?;
        decode(response).await
    }

    /// POST whose response body is ignored
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::POST, path).json(body), path)
            .await
            .map(|_| ())
    }

    pub(crate) async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::PUT, path).json(body), path)
            .await
            .map(|_| ())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), path)
            .await
            .map(|_| ())
    }

    /// Send and sort failures into network vs server-rejected errors
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(path, "request did not reach the server: {}", e);
            ShelterError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(rejection(status, &body, path == self.login_path))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ShelterError::from)
}

/// Build the error for a 4xx/5xx response
///
/// A 401 outside the login request carries a hint to log in again.
pub(crate) fn rejection(status: StatusCode, body: &str, login: bool) -> ShelterError {
    let message = server_message(body);
    if status == StatusCode::UNAUTHORIZED {
        let message = match (message, login) {
            (Some(message), true) => message,
            (None, true) => INVALID_CREDENTIALS.to_string(),
            (Some(message), false) => with_relogin_hint(&message),
            (None, false) => UNAUTHORIZED_HINT.to_string(),
        };
        return ShelterError::Unauthorized(message);
    }
    ShelterError::Server {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
    }
}

fn with_relogin_hint(message: &str) -> String {
    let message = message.trim_end();
    if message.ends_with(['.', '!', '?']) {
        format!("{} {}", message, RELOGIN_HINT)
    } else {
        format!("{}. {}", message, RELOGIN_HINT)
    }
}

/// Message the server put in its error payload, if any
pub(crate) fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "mensaje", "error", "detail"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty()),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Ok(_) => None,
        // plain-text bodies, unless it's an HTML error page
        Err(_) if !body.starts_with('<') && body.len() <= 300 => Some(body.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_fields() {
        assert_eq!(
            server_message(r#"{"message":"Credenciales inválidas"}"#).as_deref(),
            Some("Credenciales inválidas")
        );
        assert_eq!(
            server_message(r#"{"status":500,"error":"Internal Server Error"}"#).as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(server_message("Email already used").as_deref(), Some("Email already used"));
        assert_eq!(server_message(r#"{"status":500}"#), None);
        assert_eq!(server_message("<html><body>502</body></html>"), None);
        assert_eq!(server_message("   "), None);
    }

    #[test]
    fn test_rejection_classification() {
        match rejection(StatusCode::UNAUTHORIZED, "", false) {
            ShelterError::Unauthorized(msg) => assert_eq!(msg, UNAUTHORIZED_HINT),
            other => panic!("unexpected {:?}", other),
        }
        match rejection(StatusCode::BAD_GATEWAY, "", false) {
            ShelterError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, GENERIC_SERVER_ERROR);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    fn unauthorized_text(err: ShelterError) -> String {
        match err {
            ShelterError::Unauthorized(msg) => msg,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unauthorized_message_keeps_relogin_hint() {
        let err = rejection(StatusCode::UNAUTHORIZED, r#"{"message":"Token expirado"}"#, false);
        assert_eq!(unauthorized_text(err), "Token expirado. Log in again.");

        let err = rejection(StatusCode::UNAUTHORIZED, r#"{"message":"Sesión caducada."}"#, false);
        assert_eq!(unauthorized_text(err), "Sesión caducada. Log in again.");
    }

    #[test]
    fn test_login_rejection_shows_server_text_only() {
        let err = rejection(StatusCode::UNAUTHORIZED, r#"{"message":"Credenciales inválidas"}"#, true);
        assert_eq!(unauthorized_text(err), "Credenciales inválidas");

        let err = rejection(StatusCode::UNAUTHORIZED, "", true);
        assert_eq!(unauthorized_text(err), INVALID_CREDENTIALS);
    }
}
