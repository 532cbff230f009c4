//! Cookie helpers layered over the request `Cookie` header and the
//! response `Set-Cookie` header.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The `SameSite` attribute emitted on cookies. The engine-wide default
/// comes from [`Config::cookie_same_site`](crate::Config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    /// `SameSite=None` requires `secure` on the cookie to be honored by
    /// browsers.
    None,
}

impl Default for SameSite {
    fn default() -> Self {
        SameSite::Lax
    }
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A response cookie. Construct with [`Cookie::new`] and adjust the
/// attributes before passing it to
/// [`Context::set_cookie`](crate::Context::set_cookie).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    /// Lifetime in seconds; emitted as `Max-Age`.
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    /// `None` falls back to the engine-wide default.
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            ..Cookie::default()
        }
    }

    /// Renders the `Set-Cookie` header value.
    pub(crate) fn format(&self, default_same_site: SameSite) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(path) = &self.path {
            let _ = write!(out, "; Path={}", path);
        }
        if let Some(domain) = &self.domain {
            let _ = write!(out, "; Domain={}", domain);
        }
        if let Some(max_age) = self.max_age {
            let _ = write!(out, "; Max-Age={}", max_age);
        }
        let _ = write!(
            out,
            "; SameSite={}",
            self.same_site.unwrap_or(default_same_site).as_str()
        );
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Splits a request `Cookie` header into `(name, value)` pairs.
pub(crate) fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
}
