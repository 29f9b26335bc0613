//! Testing utilities for the auth bridge
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built settings, sessions, providers and cookies
//! - [`mock`] - [`MockEngine`], a scripted [`AuthEngine`](crate::engine::AuthEngine)
//! - [`requests`] - Builder for actix requests with form payloads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use authbridge::testing::{MockEngine, TestFixtures};
//! use authbridge::{AuthAction, AuthBridge};
//!
//! let engine = MockEngine::new()
//!     .with_response(AuthAction::Session, TestFixtures::session_response());
//! let bridge = AuthBridge::new(engine, TestFixtures::settings());
//! ```

pub mod fixtures;
pub mod mock;
pub mod requests;

pub use fixtures::TestFixtures;
pub use mock::MockEngine;
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Public URL used by test settings
    pub const TEST_PUBLIC_URL: &str = "http://localhost:3000";

    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    /// Default test user name
    pub const TEST_USER_NAME: &str = "Test User";

    /// Default CSRF token handed out by fixtures
    pub const TEST_CSRF_TOKEN: &str = "test_csrf_token";

    /// Providers available in fixtures
    pub const TEST_PROVIDERS: &[&str] = &["github", "google"];
}
