//! The per-request [`Context`]: request facts, extracted route parameters,
//! the response under construction, and the handler chain with its
//! cooperative `next()` protocol.

use crate::constants;
use crate::cookies::{self, Cookie, SameSite};
use crate::error::Error;
use crate::handler::BoxHandler;
use crate::types::RouteParams;
use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode, Uri, Version};
use http_body_util::Full;
use hyper::Response;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Holds one request end to end: acquired from the engine's pool, reset
/// with the request, populated by the matcher, consumed by the handler
/// chain, and released (cleared) when the response has been built.
///
/// Handlers receive `&mut Context` and drive everything through it: path
/// parameters, query values, the request body, and the response.
pub struct Context {
    method: Method,
    uri: Uri,
    version: Version,
    path: String,
    req_headers: HeaderMap,
    body: Bytes,
    remote_addr: Option<SocketAddr>,

    matched_pattern: Option<String>,
    params: RouteParams,
    pub(crate) chain: Vec<BoxHandler>,
    pub(crate) cursor: usize,

    status: StatusCode,
    res_headers: HeaderMap,
    buf: Vec<u8>,

    values: HashMap<String, Box<dyn Any + Send + Sync>>,
    same_site: SameSite,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            method: Method::GET,
            uri: Uri::default(),
            version: Version::default(),
            path: "/".to_string(),
            req_headers: HeaderMap::new(),
            body: Bytes::new(),
            remote_addr: None,
            matched_pattern: None,
            params: RouteParams::new(),
            chain: Vec::new(),
            cursor: 0,
            status: StatusCode::OK,
            res_headers: HeaderMap::new(),
            buf: Vec::new(),
            values: HashMap::new(),
            same_site: SameSite::default(),
        }
    }
}

impl Context {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn reset(
        &mut self,
        method: Method,
        uri: Uri,
        version: Version,
        path: String,
        headers: HeaderMap,
        body: Bytes,
        remote_addr: Option<SocketAddr>,
        same_site: SameSite,
    ) {
        self.method = method;
        self.uri = uri;
        self.version = version;
        self.path = path;
        self.req_headers = headers;
        self.body = body;
        self.remote_addr = remote_addr;
        self.same_site = same_site;

        self.matched_pattern = None;
        self.params.clear();
        self.chain.clear();
        self.cursor = 0;
        self.status = StatusCode::OK;
        self.res_headers.clear();
        self.buf.clear();
        self.values.clear();
    }

    /// Drops every request-scoped reference so a pooled instance carries
    /// nothing over into its next use.
    pub(crate) fn clear(&mut self) {
        self.method = Method::GET;
        self.uri = Uri::default();
        self.version = Version::default();
        self.path.clear();
        self.path.push('/');
        self.req_headers.clear();
        self.body = Bytes::new();
        self.remote_addr = None;
        self.matched_pattern = None;
        self.params.clear();
        self.chain.clear();
        self.cursor = 0;
        self.status = StatusCode::OK;
        self.res_headers.clear();
        self.buf.clear();
        self.values.clear();
    }

    pub(crate) fn set_chain(&mut self, chain: Vec<BoxHandler>) {
        self.chain = chain;
        self.cursor = 0;
    }

    pub(crate) fn set_params(&mut self, params: RouteParams) {
        self.params = params;
    }

    pub(crate) fn set_matched_pattern(&mut self, pattern: String) {
        self.matched_pattern = Some(pattern);
    }

    pub(crate) fn take_response(&mut self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(std::mem::take(&mut self.buf))));
        *response.status_mut() = self.status;
        *response.headers_mut() = std::mem::take(&mut self.res_headers);
        response
    }

    // ---- chain execution ----

    /// Advances the handler chain.
    ///
    /// Handlers run in order until the chain is exhausted or one of them
    /// returns an error, which is returned immediately without running the
    /// rest. A handler that returns without calling `next` is still
    /// followed by the remaining handlers; calling `next().await` inside a
    /// handler is only needed to run code *after* the downstream handlers,
    /// and lets that handler observe the downstream error at the call site:
    ///
    /// ```
    /// use tern::{Context, HandlerFuture};
    ///
    /// fn timing(cx: &mut Context) -> HandlerFuture<'_> {
    ///     Box::pin(async move {
    ///         let start = std::time::Instant::now();
    ///         let result = cx.next().await;
    ///         tracing::info!(elapsed = ?start.elapsed(), "request finished");
    ///         result
    ///     })
    /// }
    /// ```
    pub async fn next(&mut self) -> crate::Result<()> {
        while self.cursor < self.chain.len() {
            let handler = Arc::clone(&self.chain[self.cursor]);
            self.cursor += 1;
            handler.call(self).await?;
        }
        Ok(())
    }

    /// Skips every handler not yet run. The current handler finishes
    /// normally.
    pub fn abort(&mut self) {
        self.cursor = self.chain.len();
    }

    // ---- request accessors ----

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The percent-decoded request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The peer address, when the transport provided one.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn host(&self) -> Option<&str> {
        self.req_headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| self.uri.host())
    }

    /// The pattern of the matched route, e.g. `/user/:id`.
    pub fn pattern(&self) -> Option<&str> {
        self.matched_pattern.as_deref()
    }

    /// A request header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.req_headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.req_headers
    }

    /// The collected request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// A decoded query-string value.
    pub fn query(&self, name: &str) -> Option<String> {
        let raw = self.uri.query()?;
        for pair in raw.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if decode_component(key) == name {
                return Some(decode_component(value));
            }
        }
        None
    }

    /// A decoded query-string value, or `default` when absent.
    pub fn query_or(&self, name: &str, default: &str) -> String {
        self.query(name).unwrap_or_else(|| default.to_string())
    }

    // ---- route parameters ----

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// The value of a route parameter, if the matched pattern bound one.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// A route parameter, or `default` when absent.
    pub fn param_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.params.get(name).unwrap_or(default)
    }

    /// Parses a route parameter. `None` when the parameter is absent or
    /// fails to parse.
    pub fn param_parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.params.get(name).and_then(|value| value.parse().ok())
    }

    /// Parses a route parameter, falling back to `default` when absent or
    /// unparseable.
    pub fn param_parse_or<T: FromStr>(&self, name: &str, default: T) -> T {
        self.param_parse(name).unwrap_or(default)
    }

    // ---- request-scoped values ----

    /// Stores a request-scoped value under `key`, replacing any previous
    /// value. The store is cleared when the request ends.
    pub fn set_value<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// A request-scoped value previously stored under `key`, if its type
    /// matches.
    pub fn value<V: Any + Send + Sync>(&self, key: &str) -> Option<&V> {
        self.values.get(key).and_then(|v| v.downcast_ref())
    }

    // ---- cookies ----

    /// A request cookie value by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.req_headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(cookies::parse_cookie_header)
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// All request cookies as `(name, value)` pairs.
    pub fn cookies(&self) -> Vec<(&str, &str)> {
        self.req_headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(cookies::parse_cookie_header)
            .collect()
    }

    /// Appends a `Set-Cookie` header to the response. A cookie without its
    /// own `SameSite` gets the engine-wide default.
    pub fn set_cookie(&mut self, cookie: &Cookie) -> crate::Result<()> {
        let value = HeaderValue::from_str(&cookie.format(self.same_site))
            .map_err(|e| Error::new(format!("invalid cookie value: {e}")))?;
        self.res_headers.append(header::SET_COOKIE, value);
        Ok(())
    }

    // ---- body parsing ----

    /// Deserializes the request body as JSON. Requires an
    /// `application/json` content type; decode failures yield a 400 error.
    pub fn parse_json<T: DeserializeOwned>(&self) -> crate::Result<T> {
        let content_type = self.header(header::CONTENT_TYPE.as_str()).unwrap_or("");
        if !content_type
            .to_ascii_lowercase()
            .starts_with(constants::MIME_APPLICATION_JSON)
        {
            return Err(Error::with_status(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "expected an application/json request body",
            )
            .into());
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::with_status(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}")).into()
        })
    }

    /// Parses the JSON body and evaluates `schema` against it.
    pub fn validate(&self, schema: &crate::validator::Schema) -> crate::Result<()> {
        let value: serde_json::Value = self.parse_json()?;
        schema.check(&value)
    }

    // ---- response builders ----

    /// Sets the response status. Chains with the body writers:
    /// `cx.status(StatusCode::CREATED).json(&body)`.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Sets a response header, replacing any previous value.
    pub fn set_header(&mut self, name: &str, value: &str) -> crate::Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::new(format!("invalid header name: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::new(format!("invalid header value: {e}")))?;
        self.res_headers.insert(name, value);
        Ok(())
    }

    /// Removes a response header.
    pub fn remove_header(&mut self, name: &str) {
        self.res_headers.remove(name);
    }

    /// Writes a plain text body.
    pub fn text<S: AsRef<str>>(&mut self, body: S) -> crate::Result<()> {
        self.set_content_type(constants::MIME_TEXT_PLAIN_UTF8);
        self.buf.extend_from_slice(body.as_ref().as_bytes());
        Ok(())
    }

    /// Serializes `value` as the JSON response body.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> crate::Result<()> {
        let data = serde_json::to_vec(value)
            .map_err(|e| Error::new(format!("failed to encode JSON response: {e}")))?;
        self.set_content_type(constants::MIME_APPLICATION_JSON);
        self.buf.extend_from_slice(&data);
        Ok(())
    }

    /// Writes a raw byte body.
    pub fn bytes(&mut self, data: &[u8]) -> crate::Result<()> {
        if !self.res_headers.contains_key(header::CONTENT_TYPE) {
            self.set_content_type(constants::MIME_OCTET_STREAM);
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Answers with `{"code": .., "message": ..}`, sets the status, and
    /// skips every handler not yet run.
    pub fn fail<M: Into<String>>(&mut self, status: StatusCode, message: M) -> crate::Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            code: u16,
            message: &'a str,
        }

        self.abort();
        self.status(status);
        let message = message.into();
        self.json(&Body {
            code: status.as_u16(),
            message: &message,
        })
    }

    fn set_content_type(&mut self, mime: &'static str) {
        self.res_headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
