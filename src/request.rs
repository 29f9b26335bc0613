// Translation of actix requests into engine requests
use std::collections::HashMap;

use actix_web::http::header;
use actix_web::HttpRequest;

use crate::body::FormBody;
use crate::cookie;
use crate::error::Result;
use crate::models::{AuthAction, AuthRequest};

/// Split the catch-all segment into the action and an optional provider id
///
/// Only the first `/` separates the two: `callback/github` yields
/// `(Callback, Some("github"))`.
///
/// # Errors
///
/// Returns `BridgeError::UnknownAction` when the first part names no action.
pub fn split_route_segment(segment: &str) -> Result<(AuthAction, Option<String>)> {
    let segment = segment.trim_matches('/');
    let (action, provider_id) = match segment.split_once('/') {
        Some((action, provider_id)) => (action, Some(provider_id)),
        None => (segment, None),
    };

    let action = action.parse::<AuthAction>()?;
    let provider_id = provider_id
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned);

    Ok((action, provider_id))
}

/// Query string as a map; for repeated keys the last value wins
#[must_use]
pub fn query_params(req: &HttpRequest) -> HashMap<String, String> {
    url::form_urlencoded::parse(req.query_string().as_bytes())
        .into_owned()
        .collect()
}

/// Request headers keyed by lowercase name, repeated values joined by `", "`
#[must_use]
pub fn header_map(req: &HttpRequest) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in req.headers() {
        let Ok(value) = value.to_str() else {
            continue;
        };
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    headers
}

/// Cookies sent with the request; unreadable headers count as no cookies
#[must_use]
pub fn request_cookies(req: &HttpRequest) -> HashMap<String, String> {
    let header = req
        .headers()
        .get_all(header::COOKIE)
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    cookie::parse(&header)
}

/// Build the engine request for a call routed through the catch-all segment
///
/// `host` is the configured public URL, never the inbound `Host` header.
///
/// # Errors
///
/// Returns `BridgeError::UnknownAction` for segments naming no action.
pub fn translate(
    req: &HttpRequest,
    segment: &str,
    body: Option<FormBody>,
    host: &str,
) -> Result<AuthRequest> {
    let (action, provider_id) = split_route_segment(segment)?;
    let query = query_params(req);
    let error = query.get("error").cloned().or_else(|| provider_id.clone());

    Ok(AuthRequest {
        host: host.to_string(),
        body,
        query,
        headers: header_map(req),
        method: req.method().as_str().to_string(),
        cookies: request_cookies(req),
        action,
        provider_id,
        error,
    })
}

/// Build the engine request used by the server side helpers
///
/// These always issue a GET for a fixed action, without body or query.
#[must_use]
pub fn server_request(req: &HttpRequest, action: AuthAction, host: &str) -> AuthRequest {
    AuthRequest {
        host: host.to_string(),
        body: None,
        query: HashMap::new(),
        headers: header_map(req),
        method: "GET".to_string(),
        cookies: request_cookies(req),
        action,
        provider_id: None,
        error: None,
    }
}
