/// Constants module to avoid magic numbers in the codebase

// Application identity
pub const APP_NAME: &str = "shelter";
pub const ENV_PREFIX: &str = "SHELTER_";

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LOGIN_PATH: &str = "/usuarios/autenticar";
pub const REGISTER_PATH: &str = "/usuarios/registro";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Storage
pub const SESSION_FILE_NAME: &str = "session.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_DIR: &str = ".shelter";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_NOTICE_TTL_SECS: u64 = 4;

// User-facing messages
pub const NETWORK_ERROR_TITLE: &str = "Network error";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Could not connect to the server. Check your Internet connection.";
pub const GENERIC_SERVER_ERROR: &str = "The server could not complete the request. Try again.";
pub const UNAUTHORIZED_HINT: &str = "Your session was rejected by the server. Log in again.";
pub const RELOGIN_HINT: &str = "Log in again.";
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password.";

// Vaccination form
pub const DEFAULT_VACCINE_NAME: &str = "Vacuna Común";
pub const CUSTOM_VACCINE_MARKER: &str = "custom";
