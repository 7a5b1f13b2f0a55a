use std::sync::Arc;

use crate::api::ApiClient;
use crate::app::Config;
use crate::auth::AuthService;
use crate::notify::Notifier;
use crate::session::{AuthGate, GateView, SessionStore};
use crate::utils::Result;

/// Everything a screen or command needs, wired once at startup
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,
    /// Owner of the session
    pub gate: Arc<AuthGate>,
    /// Backend client, reads the token through the gate
    pub api: ApiClient,
    /// Login, registration and logout
    pub auth: AuthService,
    /// Where outcomes are reported
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let gate = Arc::new(AuthGate::new(store));
        let api = ApiClient::new(&config.api, gate.view())?;
        let auth = AuthService::new(api.clone(), gate.clone());

        Ok(Self {
            config: Arc::new(config),
            gate,
            api,
            auth,
            notifier,
        })
    }

    /// Read-only session view
    pub fn session(&self) -> GateView {
        self.gate.view()
    }
}
