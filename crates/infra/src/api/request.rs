//! Logical request types
//!
//! An [`ApiRequest`] is what callers hand to the transport: a verb, an
//! endpoint relative to the API base URL, and a payload. GET payloads become
//! a query string, POST payloads a JSON or multipart body.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use alacrity_domain::constants::{NAMESPACE_HEADER, NAMESPACE_VALUE, TOKEN_HEADER};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use urlencoding::encode;

use super::errors::ApiError;

/// HTTP verbs the API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// HTTP GET; fields go to the query string
    Get,
    /// HTTP POST; fields go to a JSON body
    Post,
}

impl Verb {
    /// Upper-case method name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    pub(crate) fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Self::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Self::Post)
        } else {
            Err(ApiError::InvalidRequest(format!("Unknown method: {s}")))
        }
    }
}

/// File attached to a multipart POST
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name
    pub field_name: String,
    /// File name reported to the server
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
    /// MIME type, if known
    pub mime_type: Option<String>,
}

impl FilePart {
    /// File part with no MIME type
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    /// Set the MIME type
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    fn to_part(&self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match &self.mime_type {
            Some(mime) => part.mime_str(mime).map_err(|err| {
                ApiError::InvalidRequest(format!("invalid mime type {mime}: {err}"))
            }),
            None => Ok(part),
        }
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// No body fields
    #[default]
    Empty,
    /// Flat mapping; query string for GET, JSON object for POST
    Fields(Map<String, Value>),
    /// Files sent as `multipart/form-data`; POST only
    Multipart(Vec<FilePart>),
}

impl Payload {
    /// Serialize `value` into a fields payload
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if `value` does not serialize to a
    /// JSON object or null.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(value)? {
            Value::Null => Ok(Self::Empty),
            Value::Object(map) if map.is_empty() => Ok(Self::Empty),
            Value::Object(map) => Ok(Self::Fields(map)),
            other => Err(ApiError::InvalidRequest(format!(
                "payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Whether there is nothing to send
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fields(fields) => fields.is_empty(),
            Self::Multipart(parts) => parts.is_empty(),
        }
    }

    /// Fresh multipart form; rebuilt for every attempt since forms are
    /// consumed when sent
    pub(crate) fn to_form(parts: &[FilePart]) -> Result<Form, ApiError> {
        parts.iter().try_fold(Form::new(), |form, part| {
            Ok(form.part(part.field_name.clone(), part.to_part()?))
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One logical API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    verb: Verb,
    endpoint: String,
    payload: Payload,
}

impl ApiRequest {
    /// Request with an explicit payload
    pub fn new(verb: Verb, endpoint: impl Into<String>, payload: Payload) -> Self {
        Self { verb, endpoint: endpoint.into(), payload }
    }

    /// GET without fields
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Verb::Get, endpoint, Payload::Empty)
    }

    /// POST without fields
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Verb::Post, endpoint, Payload::Empty)
    }

    /// Replace the payload
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Attach a serializable body (POST) or query fields (GET)
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if `body` is not a JSON object.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ApiError> {
        Ok(self.with_payload(Payload::from_serialize(body)?))
    }

    /// HTTP method
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Endpoint relative to the base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Body fields or file parts
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Reject requests the transport cannot send
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` for an empty endpoint or a
    /// multipart GET.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.endpoint.trim().is_empty() {
            return Err(ApiError::InvalidRequest("endpoint must not be empty".into()));
        }
        if self.verb == Verb::Get && matches!(self.payload, Payload::Multipart(_)) {
            return Err(ApiError::InvalidRequest(format!(
                "multipart payloads require POST: {}",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Absolute URL, with GET fields appended as a query string
    pub(crate) fn url(&self, base_url: &str) -> String {
        let mut url = format!("{base_url}{}", self.endpoint);
        if let (Verb::Get, Payload::Fields(fields)) = (self.verb, &self.payload) {
            if !fields.is_empty() {
                url.push(if self.endpoint.contains('?') { '&' } else { '?' });
                url.push_str(&encode_query(fields));
            }
        }
        url
    }
}

fn encode_query(fields: &Map<String, Value>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(&query_value(value))))
        .collect::<Vec<_>>()
        .join("&")
}

fn query_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Header names and namespace marker sent with every request
///
/// Immutable once built; the transport owns one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    namespace_header: HeaderName,
    namespace_value: HeaderValue,
    token_header: HeaderName,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            namespace_header: HeaderName::from_static(NAMESPACE_HEADER),
            namespace_value: HeaderValue::from_static(NAMESPACE_VALUE),
            token_header: HeaderName::from_static(TOKEN_HEADER),
        }
    }
}

impl HeaderConfig {
    /// Custom header names
    ///
    /// # Errors
    /// Returns `ApiError::Config` if a name or value is not a valid header.
    pub fn new(namespace_header: &str, namespace_value: &str, token_header: &str) -> Result<Self, ApiError> {
        let invalid = |what: &str, err: &dyn fmt::Display| {
            ApiError::Config(format!("invalid {what}: {err}"))
        };
        Ok(Self {
            namespace_header: HeaderName::from_bytes(namespace_header.as_bytes())
                .map_err(|err| invalid("namespace header", &err))?,
            namespace_value: HeaderValue::from_str(namespace_value)
                .map_err(|err| invalid("namespace value", &err))?,
            token_header: HeaderName::from_bytes(token_header.as_bytes())
                .map_err(|err| invalid("token header", &err))?,
        })
    }

    /// Headers for one attempt; the token header only when a token is held
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if the token is not a valid header
    /// value.
    pub fn build(&self, token: Option<&str>) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(self.namespace_header.clone(), self.namespace_value.clone());

        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let mut value = HeaderValue::from_str(token).map_err(|_| {
                ApiError::InvalidRequest("auth token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(self.token_header.clone(), value);
        }

        Ok(headers)
    }
}
