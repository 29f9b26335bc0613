#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authbridge crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod body;
pub mod cookie;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod request;
pub mod response;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use engine::AuthEngine;
pub use error::BridgeError;
pub use handlers::{auth_route, AuthBridge};
pub use models::{
    AuthAction, AuthCookie, AuthRequest, AuthResponse, CsrfToken, HeaderPair, PublicProvider,
    ResponseBody, Session, SessionUser,
};
pub use response::ApplyOutcome;
pub use settings::BridgeSettings;
