/// Login, registration and logout - Gateway

mod service;

pub use service::AuthService;
