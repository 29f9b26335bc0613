//! HTTP request builders for testing handlers

use actix_web::cookie::Cookie;
use actix_web::http::{header, Method};
use actix_web::test::TestRequest;
use actix_web::web::Bytes;
use actix_web::HttpRequest;

/// Builder for requests handed straight to `AuthBridge`
pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie<'static>>,
    payload: Option<Bytes>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            uri: "/".to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
            payload: None,
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.to_string();
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies
            .push(Cookie::new(name.to_string(), value.to_string()));
        self
    }

    /// Url-encoded form payload with the matching content type
    #[must_use]
    pub fn form(self, fields: &[(&str, &str)]) -> Self {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.iter())
            .finish();
        let mut builder = self.header(
            header::CONTENT_TYPE.as_str(),
            "application/x-www-form-urlencoded",
        );
        builder.payload = Some(Bytes::from(encoded));
        builder
    }

    /// `multipart/form-data` payload of text fields with the matching content type
    #[must_use]
    pub fn multipart_form(self, fields: &[(&str, &str)]) -> Self {
        const BOUNDARY: &str = "authbridge-test-boundary";
        let mut encoded = String::new();
        for (name, value) in fields {
            encoded.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        encoded.push_str(&format!("--{BOUNDARY}--\r\n"));

        let mut builder = self.header(
            header::CONTENT_TYPE.as_str(),
            &format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        builder.payload = Some(Bytes::from(encoded));
        builder
    }

    fn test_request(&self) -> TestRequest {
        let mut request = TestRequest::default()
            .method(self.method.clone())
            .uri(&self.uri);
        for (name, value) in &self.headers {
            request = request.append_header((name.as_str(), value.as_str()));
        }
        for cookie in &self.cookies {
            request = request.cookie(cookie.clone());
        }
        request
    }

    /// Request and payload, for calling `AuthBridge` methods directly
    #[must_use]
    pub fn build(self) -> (HttpRequest, Bytes) {
        let request = self.test_request().to_http_request();
        (request, self.payload.unwrap_or_default())
    }

    /// Test request carrying the payload, for `actix_web::test::call_service`
    #[must_use]
    pub fn into_test_request(self) -> TestRequest {
        let request = self.test_request();
        match self.payload {
            Some(payload) => request.set_payload(payload),
            None => request,
        }
    }
}
