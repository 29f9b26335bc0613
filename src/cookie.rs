//! `Set-Cookie` serialization and `Cookie` header parsing
//!
//! Values are percent-encoded on the way out and decoded on the way in, so
//! anything the engine stores survives a browser round trip.

use std::collections::HashMap;

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// Attributes attached to a cookie the engine asks us to set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    /// Lifetime in seconds; zero or negative expires the cookie immediately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSitePolicy>,
}

/// Render a cookie as the value of a `Set-Cookie` header
#[must_use]
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = Cookie::new(name.to_owned(), urlencoding::encode(value).into_owned());

    if let Some(path) = &options.path {
        cookie.set_path(path.clone());
    }
    if let Some(domain) = &options.domain {
        cookie.set_domain(domain.clone());
    }
    if let Some(max_age) = options.max_age {
        cookie.set_max_age(Duration::seconds(max_age));
    }
    if let Some(expires) = options.expires {
        match OffsetDateTime::from_unix_timestamp(expires.timestamp()) {
            Ok(at) => cookie.set_expires(at),
            Err(e) => log::warn!("Dropping out of range expiry for cookie {name}: {e}"),
        }
    }
    cookie.set_http_only(options.http_only);
    // An unset flag would let the cookie crate add Secure to SameSite=None
    cookie.set_secure(options.secure);
    if let Some(same_site) = options.same_site {
        cookie.set_same_site(SameSite::from(same_site));
    }

    cookie.to_string()
}

/// Parse a `Cookie` request header into name/value pairs
///
/// Never fails: malformed pairs are skipped and the first occurrence of a
/// name wins.
#[must_use]
pub fn parse(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for pair in header.split(';') {
        let Ok(cookie) = Cookie::parse(pair.trim()) else {
            continue;
        };
        if cookies.contains_key(cookie.name()) {
            continue;
        }
        let raw = strip_quotes(cookie.value());
        let value = urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned());
        cookies.insert(cookie.name().to_string(), value);
    }

    cookies
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialize_plain_cookie() {
        let header = serialize("next-auth.csrf-token", "abc123", &CookieOptions::default());
        assert_eq!(header, "next-auth.csrf-token=abc123");
    }

    #[test]
    fn test_serialize_all_attributes() {
        let options = CookieOptions {
            path: Some("/".to_string()),
            domain: Some("example.com".to_string()),
            expires: Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()),
            max_age: Some(3600),
            secure: true,
            http_only: true,
            same_site: Some(SameSitePolicy::Lax),
        };
        let header = serialize("next-auth.session-token", "token", &options);

        assert!(header.starts_with("next-auth.session-token=token"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Domain=example.com"));
        assert!(header.contains("Max-Age=3600"));
        assert!(header.contains("Expires=Wed, 02 Jan 2030 03:04:05 GMT"));
        assert!(header.contains("Secure"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
    }

    #[test]
    fn test_serialize_same_site_none_without_secure() {
        let options = CookieOptions {
            same_site: Some(SameSitePolicy::None),
            ..Default::default()
        };
        assert_eq!(serialize("a", "b", &options), "a=b; SameSite=None");

        let options = CookieOptions {
            secure: true,
            ..options
        };
        let header = serialize("a", "b", &options);
        assert!(header.contains("SameSite=None"));
        assert_eq!(header.matches("Secure").count(), 1);
    }

    #[test]
    fn test_serialize_encodes_value() {
        let header = serialize("next-auth.callback-url", "http://localhost:3000/a b", &CookieOptions::default());
        assert_eq!(
            header,
            "next-auth.callback-url=http%3A%2F%2Flocalhost%3A3000%2Fa%20b"
        );
    }

    #[test]
    fn test_parse_header() {
        let cookies = parse("a=1; b=two;c=%2Fpath");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "two");
        assert_eq!(cookies["c"], "/path");
    }

    #[test]
    fn test_parse_degrades_on_garbage() {
        assert!(parse("").is_empty());
        assert!(parse(";;;").is_empty());

        let cookies = parse("novalue; =orphan; ok=yes; ok=second");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["ok"], "yes");
    }

    #[test]
    fn test_parse_strips_quotes_and_keeps_bad_escapes() {
        let cookies = parse("q=\"quoted\"; bad=%E0%A4%A");
        assert_eq!(cookies["q"], "quoted");
        assert_eq!(cookies["bad"], "%E0%A4%A");
    }

    #[test]
    fn test_round_trip_recovers_pair() {
        let options = CookieOptions {
            path: Some("/".to_string()),
            http_only: true,
            same_site: Some(SameSitePolicy::Strict),
            ..Default::default()
        };
        for value in ["simple", "with space", "a=b&c", "ünïcode", ""] {
            let header = serialize("next-auth.state", value, &options);
            let name_value = header.split(';').next().unwrap();
            let parsed = parse(name_value);
            assert_eq!(parsed.get("next-auth.state").map(String::as_str), Some(value));
        }
    }
}
