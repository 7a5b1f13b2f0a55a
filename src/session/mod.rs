/// Session management module - Gateway

mod gate;
mod model;
mod store;

pub use gate::{AuthGate, GateState, GateView};
pub use model::{CachedProfile, Session};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
