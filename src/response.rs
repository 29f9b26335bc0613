//! Applying engine responses to actix responses
//!
//! Headers and cookies are applied in the order the engine produced them.
//! Redirects are not thrown: [`apply`] reports them as
//! [`ApplyOutcome::Redirect`] and [`ApplyOutcome::into_response`] renders the
//! 302, keeping everything already applied to the builder.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, HttpResponseBuilder};
use log::debug;
use serde_json::json;

use crate::cookie;
use crate::models::{AuthCookie, AuthResponse, ResponseBody};

/// What the caller should do once headers and cookies are applied
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Stop here and send a 302 to the target
    Redirect(String),
    /// Send `body` (if any) with `status`
    Body {
        status: StatusCode,
        body: Option<ResponseBody>,
    },
}

impl ApplyOutcome {
    /// Finish the builder according to the outcome
    pub fn into_response(self, builder: &mut HttpResponseBuilder) -> HttpResponse {
        match self {
            ApplyOutcome::Redirect(location) => builder
                .status(StatusCode::FOUND)
                .insert_header((header::LOCATION, location))
                .finish(),
            ApplyOutcome::Body { status, body } => {
                builder.status(status);
                match body {
                    None => builder.finish(),
                    Some(ResponseBody::Html(markup)) => builder.body(markup),
                    Some(body) => builder.json(body),
                }
            }
        }
    }
}

/// Drop cookies that must not reach the client
///
/// An empty state cookie is only the engine clearing state it never set;
/// applying it would clobber the cookies that matter.
pub fn cookies_to_apply<'a>(
    cookies: &'a [AuthCookie],
    state_cookie_name: &'a str,
) -> impl Iterator<Item = &'a AuthCookie> + 'a {
    cookies.iter().filter(move |c| {
        let skip = c.name == state_cookie_name && c.value.is_empty();
        if skip {
            debug!("Skipping empty {state_cookie_name} cookie");
        }
        !skip
    })
}

/// Append one `Set-Cookie` header per cookie
pub fn set_cookies<'a, I>(builder: &mut HttpResponseBuilder, cookies: I)
where
    I: IntoIterator<Item = &'a AuthCookie>,
{
    for c in cookies {
        builder.append_header((
            header::SET_COOKIE,
            cookie::serialize(&c.name, &c.value, &c.options),
        ));
    }
}

/// Apply an engine response to `builder` and decide how to finish it
///
/// `json_requested` reflects the `json=true` form sentinel: redirects are
/// then answered with `{"url": ...}` instead of a 302.
pub fn apply(
    builder: &mut HttpResponseBuilder,
    response: AuthResponse,
    json_requested: bool,
    state_cookie_name: &str,
) -> ApplyOutcome {
    let AuthResponse {
        status,
        headers,
        body,
        redirect,
        cookies,
    } = response;

    for pair in headers {
        builder.append_header((pair.key, pair.value));
    }
    set_cookies(builder, cookies_to_apply(&cookies, state_cookie_name));

    if let Some(url) = redirect {
        if !json_requested {
            debug!("Redirecting to {url}");
            return ApplyOutcome::Redirect(url);
        }
        debug!("Answering redirect to {url} as JSON");
        builder.insert_header((header::CONTENT_TYPE, "application/json"));
        return ApplyOutcome::Body {
            status: StatusCode::OK,
            body: Some(ResponseBody::Json(json!({ "url": url }))),
        };
    }

    let status = status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);
    builder.status(status);

    ApplyOutcome::Body { status, body }
}
