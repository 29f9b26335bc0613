//! Test fixtures providing pre-built test objects

use std::collections::HashMap;

use crate::cookie::{CookieOptions, SameSitePolicy};
use crate::models::{
    AuthCookie, AuthResponse, CsrfToken, PublicProvider, ResponseBody, Session, SessionUser,
};
use crate::settings::BridgeSettings;

use super::constants::{TEST_CSRF_TOKEN, TEST_EMAIL, TEST_PROVIDERS, TEST_PUBLIC_URL, TEST_USER_NAME};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Settings pointing at the local test URL
    #[must_use]
    pub fn settings() -> BridgeSettings {
        let mut settings = BridgeSettings::default();
        settings.application.public_url = TEST_PUBLIC_URL.to_string();
        settings
    }

    /// A signed-in session for the default test user
    #[must_use]
    pub fn session() -> Session {
        Session {
            user: Some(SessionUser {
                name: Some(TEST_USER_NAME.to_string()),
                email: Some(TEST_EMAIL.to_string()),
                image: None,
                ..Default::default()
            }),
            expires: Some("2030-01-01T00:00:00.000Z".to_string()),
            ..Default::default()
        }
    }

    /// Public provider entry as the engine would list it
    #[must_use]
    pub fn provider(id: &str) -> PublicProvider {
        PublicProvider {
            id: id.to_string(),
            name: id.to_string(),
            provider_type: "oauth".to_string(),
            signin_url: format!("{TEST_PUBLIC_URL}/api/auth/signin/{id}"),
            callback_url: format!("{TEST_PUBLIC_URL}/api/auth/callback/{id}"),
        }
    }

    #[must_use]
    pub fn providers() -> HashMap<String, PublicProvider> {
        TEST_PROVIDERS
            .iter()
            .map(|id| ((*id).to_string(), Self::provider(id)))
            .collect()
    }

    /// Session token cookie with the attributes the engine normally sets
    #[must_use]
    pub fn session_cookie(value: &str) -> AuthCookie {
        AuthCookie::new(
            "next-auth.session-token",
            value,
            CookieOptions {
                path: Some("/".to_string()),
                http_only: true,
                same_site: Some(SameSitePolicy::Lax),
                ..Default::default()
            },
        )
    }

    /// State cookie; an empty value is the engine clearing it
    #[must_use]
    pub fn state_cookie(value: &str) -> AuthCookie {
        AuthCookie::new(
            "next-auth.state",
            value,
            CookieOptions {
                path: Some("/".to_string()),
                http_only: true,
                max_age: Some(if value.is_empty() { 0 } else { 900 }),
                ..Default::default()
            },
        )
    }

    #[must_use]
    pub fn session_response() -> AuthResponse {
        AuthResponse::with_body(ResponseBody::Session(Self::session()))
            .header("Content-Type", "application/json")
    }

    /// What the engine answers for a visitor without a session
    #[must_use]
    pub fn signed_out_response() -> AuthResponse {
        AuthResponse::with_body(ResponseBody::Session(Session::default()))
    }

    #[must_use]
    pub fn csrf_response() -> AuthResponse {
        AuthResponse::with_body(ResponseBody::Csrf(CsrfToken {
            csrf_token: TEST_CSRF_TOKEN.to_string(),
        }))
    }

    #[must_use]
    pub fn providers_response() -> AuthResponse {
        AuthResponse::with_body(ResponseBody::Providers(Self::providers()))
    }

    /// Redirect carrying the cookies a sign-in usually sets
    #[must_use]
    pub fn redirect_response(url: &str) -> AuthResponse {
        AuthResponse::with_redirect(url)
            .cookie(Self::state_cookie(""))
            .cookie(AuthCookie::new(
                "next-auth.callback-url",
                format!("{TEST_PUBLIC_URL}/"),
                CookieOptions::default(),
            ))
            .cookie(AuthCookie::new(
                "next-auth.csrf-token",
                TEST_CSRF_TOKEN,
                CookieOptions::default(),
            ))
    }
}
