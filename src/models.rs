use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::body::{FormBody, FormValue};
use crate::cookie::CookieOptions;
use crate::error::BridgeError;

/// Authentication operation selected by the catch-all route segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthAction {
    Session,
    Csrf,
    Providers,
    Signin,
    Signout,
    Callback,
    Error,
    VerifyRequest,
}

impl AuthAction {
    pub const ALL: [AuthAction; 8] = [
        AuthAction::Session,
        AuthAction::Csrf,
        AuthAction::Providers,
        AuthAction::Signin,
        AuthAction::Signout,
        AuthAction::Callback,
        AuthAction::Error,
        AuthAction::VerifyRequest,
    ];

    /// Route segment spelling of the action
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuthAction::Session => "session",
            AuthAction::Csrf => "csrf",
            AuthAction::Providers => "providers",
            AuthAction::Signin => "signin",
            AuthAction::Signout => "signout",
            AuthAction::Callback => "callback",
            AuthAction::Error => "error",
            AuthAction::VerifyRequest => "verify-request",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthAction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownAction(s.to_string()))
    }
}

/// Framework independent request handed to the authentication engine
///
/// Built fresh for every inbound request and dropped once the engine returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<FormBody>,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub method: String,
    pub cookies: HashMap<String, String>,
    pub action: AuthAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthRequest {
    /// Whether the client posted `json=true`, asking for `{url}` instead of a 302
    #[must_use]
    pub fn json_requested(&self) -> bool {
        matches!(
            self.body.as_ref().and_then(|body| body.get("json")),
            Some(FormValue::Single(value)) if value == "true"
        )
    }
}

/// A single response header emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPair {
    pub key: String,
    pub value: String,
}

impl HeaderPair {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Cookie the engine wants set on the outbound response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub options: CookieOptions,
}

impl AuthCookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }
}

/// User record nested in a [`Session`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session as reported by the engine. Relayed, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// An empty session is how the engine says "not signed in"
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.expires.is_none() && self.extra.is_empty()
    }

    /// Wrap an engine session object without dropping anything
    ///
    /// Objects whose `user` or `expires` do not have the usual shape are kept
    /// whole in `extra`, so they serialize back unchanged.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map.clone())).unwrap_or_else(|e| {
            log::debug!("Relaying session with unconventional shape: {e}");
            Self {
                extra: map,
                ..Self::default()
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Provider metadata safe to expose to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProvider {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub signin_url: String,
    pub callback_url: String,
}

/// Body produced by the engine, tagged by the shape each action yields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Session(Session),
    Csrf(CsrfToken),
    Providers(HashMap<String, PublicProvider>),
    /// Any other structured payload
    Json(Value),
    /// Pre-rendered markup such as sign-in or error pages
    Html(String),
}

/// Framework independent response returned by the authentication engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    pub status: Option<u16>,
    pub headers: Vec<HeaderPair>,
    pub body: Option<ResponseBody>,
    pub redirect: Option<String>,
    pub cookies: Vec<AuthCookie>,
}

impl AuthResponse {
    #[must_use]
    pub fn with_body(body: ResponseBody) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_redirect(url: impl Into<String>) -> Self {
        Self {
            redirect: Some(url.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderPair::new(key, value));
        self
    }

    #[must_use]
    pub fn cookie(mut self, cookie: AuthCookie) -> Self {
        self.cookies.push(cookie);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::flatten;
    use serde_json::json;

    fn request_with_body(body: Option<FormBody>) -> AuthRequest {
        AuthRequest {
            host: "http://localhost:3000".to_string(),
            body,
            query: HashMap::new(),
            headers: HashMap::new(),
            method: "POST".to_string(),
            cookies: HashMap::new(),
            action: AuthAction::Signin,
            provider_id: Some("github".to_string()),
            error: Some("github".to_string()),
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("callback".parse::<AuthAction>().unwrap(), AuthAction::Callback);
        assert_eq!(
            "verify-request".parse::<AuthAction>().unwrap(),
            AuthAction::VerifyRequest
        );
        assert!(matches!(
            "Signin".parse::<AuthAction>(),
            Err(BridgeError::UnknownAction(name)) if name == "Signin"
        ));
        for action in AuthAction::ALL {
            assert_eq!(action.as_str().parse::<AuthAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_json_requested_sentinel() {
        let body = flatten([("json", "true"), ("csrfToken", "abc")]);
        assert!(request_with_body(Some(body)).json_requested());

        let body = flatten([("json", "false")]);
        assert!(!request_with_body(Some(body)).json_requested());

        let body = flatten([("json", "true"), ("json", "true")]);
        assert!(!request_with_body(Some(body)).json_requested());

        assert!(!request_with_body(None).json_requested());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let value = serde_json::to_value(request_with_body(None)).unwrap();
        assert_eq!(value["providerId"], "github");
        assert_eq!(value["action"], "signin");
        assert!(value.get("body").is_none());
    }

    #[test]
    fn test_session_empty_detection() {
        assert!(Session::default().is_empty());

        let session: Session = serde_json::from_value(json!({
            "user": { "name": "Ada", "email": "ada@example.com" },
            "expires": "2026-11-18T00:00:00.000Z"
        }))
        .unwrap();
        assert!(!session.is_empty());
        assert_eq!(
            session.user.as_ref().and_then(|u| u.email.as_deref()),
            Some("ada@example.com")
        );
    }

    #[test]
    fn test_session_keeps_unknown_fields() {
        let raw = json!({ "expires": "2026-11-18", "accessToken": "opaque" });
        let session: Session = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&session).unwrap(), raw);
    }

    #[test]
    fn test_session_from_map_keeps_odd_shapes() {
        let Value::Object(map) = json!({ "user": { "name": "Ada" }, "expires": 1_893_456_000 }) else {
            unreachable!()
        };
        let session = Session::from_map(map.clone());
        assert!(session.user.is_none());
        assert_eq!(session.extra, map);

        let Value::Object(map) = json!({ "expires": "2026-11-18" }) else {
            unreachable!()
        };
        assert_eq!(Session::from_map(map).expires.as_deref(), Some("2026-11-18"));
    }

    #[test]
    fn test_public_provider_wire_names() {
        let provider = PublicProvider {
            id: "github".to_string(),
            name: "GitHub".to_string(),
            provider_type: "oauth".to_string(),
            signin_url: "http://localhost/api/auth/signin/github".to_string(),
            callback_url: "http://localhost/api/auth/callback/github".to_string(),
        };
        let value = serde_json::to_value(&provider).unwrap();
        assert_eq!(value["type"], "oauth");
        assert_eq!(value["signinUrl"], "http://localhost/api/auth/signin/github");
        assert_eq!(value["callbackUrl"], "http://localhost/api/auth/callback/github");
    }
}
