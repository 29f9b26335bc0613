//! Form body flattening
//!
//! Submitted forms arrive as ordered key/value pairs where a key may repeat.
//! The engine expects a map whose values are a scalar for single keys and a
//! list, in submission order, for repeated ones. Both url-encoded and
//! `multipart/form-data` submissions are read; multipart file parts are not
//! forwarded.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use std::convert::Infallible;

use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::HttpRequest;
use futures_util::stream;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const FORM_MULTIPART: &str = "multipart/form-data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FormValue {
    /// The value when the key was submitted exactly once
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FormValue::Single(value) => Some(value),
            FormValue::Multiple(_) => None,
        }
    }

    /// All submitted values in order
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            FormValue::Single(value) => vec![value.as_str()],
            FormValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            FormValue::Multiple(values) => values.push(value),
            FormValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FormValue::Multiple(vec![first, value]);
            }
        }
    }
}

pub type FormBody = HashMap<String, FormValue>;

/// Collapse ordered form entries into a [`FormBody`]
pub fn flatten<I, K, V>(entries: I) -> FormBody
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut body = FormBody::new();
    for (key, value) in entries {
        match body.entry(key.into()) {
            Entry::Occupied(mut slot) => slot.get_mut().push(value.into()),
            Entry::Vacant(slot) => {
                slot.insert(FormValue::Single(value.into()));
            }
        }
    }
    body
}

/// Read the request payload as a form, if it is one
///
/// Anything that is not a url-encoded or multipart form yields `None`; a
/// missing body is normal for GET driven actions and is not an error.
pub async fn extract_form_body(req: &HttpRequest, payload: &[u8]) -> Option<FormBody> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())?;

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        FORM_URLENCODED => Some(flatten(
            url::form_urlencoded::parse(payload)
                .map(|(key, value)| (key.into_owned(), value.into_owned())),
        )),
        FORM_MULTIPART => parse_multipart(content_type, payload)
            .await
            .inspect_err(|e| warn!("Ignoring malformed multipart body: {e}"))
            .ok(),
        _ => {
            debug!("Skipping form extraction for content type {essence}");
            None
        }
    }
}

/// Collect the text fields of a buffered multipart payload in order
async fn parse_multipart(content_type: &str, payload: &[u8]) -> multer::Result<FormBody> {
    let boundary = multer::parse_boundary(content_type)?;
    let chunk = Bytes::copy_from_slice(payload);
    let mut multipart = multer::Multipart::new(
        stream::once(async move { Ok::<_, Infallible>(chunk) }),
        boundary,
    );

    let mut entries = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            debug!("Skipping multipart file field {name}");
            continue;
        }
        entries.push((name, field.text().await?));
    }

    Ok(flatten(entries))
}
