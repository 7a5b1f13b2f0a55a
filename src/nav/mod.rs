// Gateway module for navigation - follows the Train Station Pattern
// All external access must go through this gateway

mod routes;

pub use routes::{Root, Route};
