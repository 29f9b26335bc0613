// HTTP entry points: the catch-all auth route and the server side helpers
use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use log::{debug, error, warn};
use serde_json::Value;

use crate::body::extract_form_body;
use crate::engine::AuthEngine;
use crate::error::{BridgeError, Result};
use crate::models::{AuthAction, AuthRequest, AuthResponse, PublicProvider, ResponseBody, Session};
use crate::request::{server_request, translate};
use crate::response::{apply, cookies_to_apply, set_cookies};
use crate::settings::BridgeSettings;

/// Binds an [`AuthEngine`] to actix-web
///
/// One bridge serves every request; it holds only the engine and the
/// immutable settings, so cloning it is cheap.
pub struct AuthBridge<E> {
    engine: Arc<E>,
    settings: Arc<BridgeSettings>,
}

impl<E> Clone for AuthBridge<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<E: AuthEngine + 'static> AuthBridge<E> {
    #[must_use]
    pub fn new(engine: E, settings: BridgeSettings) -> Self {
        Self::from_shared(Arc::new(engine), settings)
    }

    #[must_use]
    pub fn from_shared(engine: Arc<E>, settings: BridgeSettings) -> Self {
        if settings.has_placeholder_url() {
            warn!(
                "Public URL is still the build placeholder; set NEXTAUTH_URL or application.public_url"
            );
        }
        Self {
            engine,
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mount the catch-all auth route for both GET and POST
    ///
    /// ```ignore
    /// let bridge = AuthBridge::new(engine, settings);
    /// HttpServer::new(move || App::new().configure(|cfg| bridge.configure(cfg)))
    /// ```
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let pattern = self.settings.route_pattern();
        cfg.app_data(web::Data::new(self.clone()))
            .route(&pattern, web::get().to(auth_route::<E>))
            .route(&pattern, web::post().to(auth_route::<E>));
    }

    /// Run one request through translate, engine and apply
    ///
    /// # Errors
    ///
    /// Returns an error if the segment names no known action or the engine
    /// fails.
    pub async fn handle(
        &self,
        req: &HttpRequest,
        segment: &str,
        payload: &[u8],
    ) -> Result<HttpResponse> {
        let body = extract_form_body(req, payload).await;
        let auth_request = translate(req, segment, body, &self.settings.application.public_url)
            .inspect_err(|e| warn!("Rejecting auth route {segment}: {e}"))?;
        let json_requested = auth_request.json_requested();

        let auth_response = self.invoke(auth_request).await?;

        let mut builder = HttpResponse::Ok();
        let outcome = apply(
            &mut builder,
            auth_response,
            json_requested,
            &self.settings.cookies.state_cookie_name,
        );
        Ok(outcome.into_response(&mut builder))
    }

    /// Current session, or `None` when nobody is signed in
    ///
    /// Cookies the engine emits (session refresh) are appended to `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails.
    pub async fn get_server_session(
        &self,
        req: &HttpRequest,
        response: &mut HttpResponseBuilder,
    ) -> Result<Option<Session>> {
        let AuthResponse { body, cookies, .. } = self.invoke_server(req, AuthAction::Session).await?;

        set_cookies(
            response,
            cookies_to_apply(&cookies, &self.settings.cookies.state_cookie_name),
        );

        Ok(body.and_then(session_from_body))
    }

    /// CSRF token for the current visitor
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingCsrfToken` when the engine answers without
    /// a token, or an engine error.
    pub async fn get_server_csrf_token(&self, req: &HttpRequest) -> Result<String> {
        let AuthResponse { body, .. } = self.invoke_server(req, AuthAction::Csrf).await?;

        match body {
            Some(ResponseBody::Csrf(token)) => Ok(token.csrf_token),
            Some(ResponseBody::Json(value)) => value
                .get("csrfToken")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
                .ok_or(BridgeError::MissingCsrfToken),
            _ => Err(BridgeError::MissingCsrfToken),
        }
    }

    /// Configured providers keyed by id, or `None` for an unexpected body
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails or a JSON body does not describe
    /// providers.
    pub async fn get_server_providers(
        &self,
        req: &HttpRequest,
    ) -> Result<Option<HashMap<String, PublicProvider>>> {
        let AuthResponse { body, .. } = self.invoke_server(req, AuthAction::Providers).await?;

        match body {
            Some(ResponseBody::Providers(providers)) => Ok(Some(providers)),
            Some(ResponseBody::Json(Value::String(_) | Value::Null)) => Ok(None),
            Some(ResponseBody::Json(value)) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    async fn invoke_server(&self, req: &HttpRequest, action: AuthAction) -> Result<AuthResponse> {
        let request = server_request(req, action, &self.settings.application.public_url);
        self.invoke(request).await
    }

    async fn invoke(&self, request: AuthRequest) -> Result<AuthResponse> {
        let action = request.action;
        debug!(
            "Dispatching {} {action} (provider: {:?})",
            request.method, request.provider_id
        );
        self.engine.handle(request).await.map_err(|e| {
            error!("Auth engine failed on {action}: {e:#}");
            BridgeError::Engine(e)
        })
    }
}

/// Normalise a session body: empty objects and strings mean "signed out"
fn session_from_body(body: ResponseBody) -> Option<Session> {
    match body {
        ResponseBody::Session(session) if !session.is_empty() => Some(session),
        ResponseBody::Json(Value::Object(map)) if !map.is_empty() => Some(Session::from_map(map)),
        _ => None,
    }
}

/// Shared GET/POST handler for the catch-all route
///
/// # Errors
///
/// Returns an error if the action is unknown or the engine fails.
pub async fn auth_route<E: AuthEngine + 'static>(
    req: HttpRequest,
    segment: web::Path<String>,
    payload: web::Bytes,
    bridge: web::Data<AuthBridge<E>>,
) -> Result<HttpResponse> {
    bridge.handle(&req, &segment, &payload).await
}
