use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiClient, UserProfile};
use crate::forms::{LoginForm, ProfileForm, RegisterForm};
use crate::nav::Route;
use crate::session::{AuthGate, GateView, Session};
use crate::utils::{Result, ShelterError};

/// The only component allowed to change the session
///
/// Each operation resolves to the route the caller should navigate to. The
/// route is returned only after the session store has been updated.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    gate: Arc<AuthGate>,
}

impl AuthService {
    pub fn new(api: ApiClient, gate: Arc<AuthGate>) -> Self {
        Self { api, gate }
    }

    pub fn view(&self) -> GateView {
        self.gate.view()
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Route> {
        let request = form.validate()?;

        let session = Session::from(self.api.authenticate(&request).await?);
        if !session.is_present() {
            return Err(ShelterError::Decode(
                "login response carried neither a user id nor a token".to_string(),
            ));
        }

        self.gate.sign_in(session).await?;
        info!(email = %request.email, "login succeeded");

        // the login stands even if the profile cannot be fetched
        if let Err(e) = self.refresh_profile().await {
            warn!("could not cache the user profile: {}", e);
        }

        Ok(Route::Dashboard)
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn register(&self, form: &RegisterForm) -> Result<Route> {
        let request = form.validate()?;
        self.api.register(&request).await?;
        info!(email = %request.email, "account registered");
        Ok(Route::Login)
    }

    pub async fn logout(&self) -> Result<Route> {
        self.gate.sign_out().await?;
        Ok(Route::Login)
    }

    /// Send profile changes and keep the cached copy in step
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UserProfile> {
        let update = form.validate()?;
        self.api.update_profile(&update).await?;
        self.refresh_profile().await
    }

    async fn refresh_profile(&self) -> Result<UserProfile> {
        let profile = self.api.get_profile().await?;
        self.gate.cache_profile(&profile.to_cache()).await?;
        Ok(profile)
    }
}
