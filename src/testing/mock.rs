//! Mock authentication engine
//!
//! Answers with canned responses per action and records every request it
//! receives so tests can assert on the translated input.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::engine::AuthEngine;
use crate::models::{AuthAction, AuthRequest, AuthResponse};

#[derive(Debug, Default)]
pub struct MockEngine {
    responses: HashMap<AuthAction, AuthResponse>,
    failure: Option<String>,
    requests: Mutex<Vec<AuthRequest>>,
}

impl MockEngine {
    /// Engine answering every action with an empty 200 response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose every call fails with `message`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Answer `action` with `response`
    #[must_use]
    pub fn with_response(mut self, action: AuthAction, response: AuthResponse) -> Self {
        self.responses.insert(action, response);
        self
    }

    /// Every request received so far, oldest first
    #[must_use]
    pub fn requests(&self) -> Vec<AuthRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<AuthRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl AuthEngine for MockEngine {
    async fn handle(&self, request: AuthRequest) -> anyhow::Result<AuthResponse> {
        let action = request.action;
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some(message) = &self.failure {
            return Err(anyhow!("{message}"));
        }
        Ok(self.responses.get(&action).cloned().unwrap_or_default())
    }
}
