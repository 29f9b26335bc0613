//! Authentication engine contract
//!
//! The engine owns provider negotiation, token issuance, CSRF protection and
//! session strategy. This crate only feeds it requests and relays what it
//! answers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{AuthRequest, AuthResponse};

/// An authentication engine driven through framework independent I/O
///
/// Implementations decide GET versus POST semantics per action themselves.
///
/// # Errors
///
/// `handle` fails when the engine cannot complete the action (provider
/// unreachable, signing failure, store errors). The bridge propagates the
/// error unchanged and performs no retries.
#[async_trait]
pub trait AuthEngine: Send + Sync {
    async fn handle(&self, request: AuthRequest) -> anyhow::Result<AuthResponse>;
}

#[async_trait]
impl<T: AuthEngine + ?Sized> AuthEngine for Arc<T> {
    async fn handle(&self, request: AuthRequest) -> anyhow::Result<AuthResponse> {
        (**self).handle(request).await
    }
}

#[async_trait]
impl<T: AuthEngine + ?Sized> AuthEngine for Box<T> {
    async fn handle(&self, request: AuthRequest) -> anyhow::Result<AuthResponse> {
        (**self).handle(request).await
    }
}
