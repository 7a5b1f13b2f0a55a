pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod constants;
pub mod forms;
pub mod nav;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;
pub mod views;

pub use app::{load_config, AppState, Config};
pub use auth::AuthService;
pub use nav::{Root, Route};
pub use session::{AuthGate, GateState, GateView, Session, SessionStore};
pub use tui::run_ui;
pub use utils::{ShelterError, ValidationError};
