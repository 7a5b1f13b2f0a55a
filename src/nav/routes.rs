use std::fmt;

/// The mutually exclusive top-level screen sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// Shown until the stored session has been read
    Splash,
    /// Login and registration
    Auth,
    /// Everything that needs a session
    Authenticated,
}

impl Root {
    /// Whether `route` may be mounted under this root
    pub fn admits(&self, route: &Route) -> bool {
        match self {
            Self::Splash => false,
            Self::Auth => !route.requires_session(),
            Self::Authenticated => route.requires_session(),
        }
    }

    /// Where a navigation request actually lands under this root
    pub fn resolve(&self, route: Route) -> Route {
        match self {
            _ if self.admits(&route) => route,
            Self::Authenticated => Route::Dashboard,
            Self::Auth | Self::Splash => Route::Login,
        }
    }

    /// The screen a freshly mounted root opens on
    pub fn entry(&self) -> Route {
        match self {
            Self::Authenticated => Route::Dashboard,
            Self::Auth | Self::Splash => Route::Login,
        }
    }
}

/// Named screens with their parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Adopters,
    RegisterAnimal,
    EditAnimal { id: String },
    AnimalHistory { id: String },
    AnimalVaccines { id: String },
    ScheduleAppointment,
    AppointmentDetails { id: String },
    EditAppointment { id: String },
    Calendar,
    HealthRecords,
    Profile,
    Logout,
}

impl Route {
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Route name as used in navigation requests
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Adopters => "Adopters",
            Self::RegisterAnimal => "RegisterAnimal",
            Self::EditAnimal { .. } => "EditAnimal",
            Self::AnimalHistory { .. } => "AnimalHistory",
            Self::AnimalVaccines { .. } => "AnimalVaccines",
            Self::ScheduleAppointment => "ScheduleAppointment",
            Self::AppointmentDetails { .. } => "AppointmentDetails",
            Self::EditAppointment { .. } => "EditAppointment",
            Self::Calendar => "Calendar",
            Self::HealthRecords => "HealthRecords",
            Self::Profile => "Profile",
            Self::Logout => "Logout",
        }
    }

    /// Identifier parameter, for routes that carry one
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::EditAnimal { id }
            | Self::AnimalHistory { id }
            | Self::AnimalVaccines { id }
            | Self::AppointmentDetails { id }
            | Self::EditAppointment { id } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}({})", self.name(), id),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_root_redirects_private_routes() {
        assert_eq!(Root::Auth.resolve(Route::Dashboard), Route::Login);
        assert_eq!(
            Root::Auth.resolve(Route::EditAnimal { id: "3".into() }),
            Route::Login
        );
        assert_eq!(Root::Auth.resolve(Route::Register), Route::Register);
    }

    #[test]
    fn test_authenticated_root_skips_login() {
        assert_eq!(Root::Authenticated.resolve(Route::Login), Route::Dashboard);
        assert_eq!(Root::Authenticated.resolve(Route::Calendar), Route::Calendar);
    }

    #[test]
    fn test_splash_admits_nothing() {
        assert!(!Root::Splash.admits(&Route::Login));
        assert!(!Root::Splash.admits(&Route::Dashboard));
        assert_eq!(Root::Splash.entry(), Route::Login);
    }

    #[test]
    fn test_display_includes_parameter() {
        assert_eq!(
            Route::AppointmentDetails { id: "12".into() }.to_string(),
            "AppointmentDetails(12)"
        );
        assert_eq!(Route::Profile.to_string(), "Profile");
    }
}
