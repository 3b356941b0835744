//! Request-shape extractors: the asynchronous-request signal and the referer.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, REFERER};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Whether the caller expects a structured result rather than a redirect.
///
/// True when `X-Requested-With: XMLHttpRequest` is sent, or when `Accept`
/// lists `application/json` ahead of `text/html`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsAsync(pub bool);

impl IsAsync {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let xhr = headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
        if xhr {
            return IsAsync(true);
        }

        let accept = headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        IsAsync(prefers_json(accept))
    }
}

fn prefers_json(accept: &str) -> bool {
    let position = |needle: &str| {
        accept
            .split(',')
            .position(|part| part.trim().starts_with(needle))
    };
    match (position("application/json"), position("text/html")) {
        (Some(json), Some(html)) => json < html,
        (Some(_), None) => true,
        _ => false,
    }
}

impl<S: Send + Sync> FromRequestParts<S> for IsAsync {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IsAsync::from_headers(&parts.headers))
    }
}

/// The `Referer` header, `None` when missing, empty or not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referer(pub Option<String>);

impl Referer {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Referer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let referer = parts
            .headers
            .get(REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(Referer(referer))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn xhr_header_marks_async() {
        let h = headers(&[("x-requested-with", "XMLHttpRequest")]);
        assert_eq!(IsAsync::from_headers(&h), IsAsync(true));
    }

    #[test]
    fn accept_order_decides() {
        let json_first = headers(&[("accept", "application/json, text/html")]);
        let html_first = headers(&[("accept", "text/html,application/json;q=0.9")]);
        assert_eq!(IsAsync::from_headers(&json_first), IsAsync(true));
        assert_eq!(IsAsync::from_headers(&html_first), IsAsync(false));
    }

    #[test]
    fn plain_browser_request_is_not_async() {
        assert_eq!(IsAsync::from_headers(&HeaderMap::new()), IsAsync(false));
        let h = headers(&[("accept", "*/*")]);
        assert_eq!(IsAsync::from_headers(&h), IsAsync(false));
    }
}
