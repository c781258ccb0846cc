use std::str::FromStr;

use bytes::Bytes;

/// This trait exposes all of the information about a HTTP request that is required to
/// produce the `Authorization` header, and lets the signer write the headers it
/// computes.
///
/// The [OwnedRequest] type is provided for simple use cases where you do not have
/// preexisting structs representing HTTP requests. Support for the
/// [http](https://crates.io/crates/http) crate's `Request` type can be enabled with the
/// `http` **feature**, which is off by default.
pub trait RequestAccessor {
    /// Iterator over `(name, value)` header pairs, in request order.
    type HeaderIter<'a>: Iterator<Item = (&'a str, &'a str)> where Self: 'a;

    /// The HTTP method.
    fn method(&self) -> Method;

    /// The full request URL, including scheme and authority. Query parameters are
    /// normally supplied separately through [parameters](RequestAccessor::parameters).
    fn url(&self) -> &str;

    /// The raw body bytes. If the request does not contain a body, this function should
    /// return a 0-length slice.
    fn body(&self) -> &[u8];

    /// Returns the value of the first header whose name matches `name`, ignoring ASCII
    /// case.
    fn header(&self, name: &str) -> Option<&str>;

    /// Returns an iterator over all headers on the request.
    fn headers(&self) -> Self::HeaderIter<'_>;

    /// Sets a header, replacing the value of an existing header with the same name
    /// (ignoring ASCII case) or appending a new one.
    fn set_header(&mut self, name: &str, value: &str);

    /// Returns true if a header with the given `name` is present, even with an empty
    /// value.
    fn has_header(&self, name: &str) -> bool {
        self.headers().any(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// The query parameters, in the order they should appear in the request target.
    /// Values are raw, not percent-encoded.
    fn parameters(&self) -> &[QueryParam];
}

/// A single query parameter with an unencoded value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// This is a simple implementation of [RequestAccessor] that does not depend on any
/// external library. It owns all of the request data and keeps headers in insertion
/// order.
#[derive(Clone, Debug)]
pub struct OwnedRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    parameters: Vec<QueryParam>,
}

impl OwnedRequest {
    /// Build a new [OwnedRequest] with no headers, body, or query parameters.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(QueryParam::new(name, value));
        self
    }
}

impl RequestAccessor for OwnedRequest {
    type HeaderIter<'a> = HeaderIter<'a>;

    fn method(&self) -> Method {
        self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn headers(&self) -> Self::HeaderIter<'_> {
        HeaderIter { iter: self.headers.iter() }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn parameters(&self) -> &[QueryParam] {
        &self.parameters
    }
}

/// Iterator over the headers of an [OwnedRequest].
pub struct HeaderIter<'a> {
    iter: std::slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for HeaderIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// An HTTP method such as GET, POST, etc.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Method {
    Options,
    Get,
    Post,
    Put,
    Delete,
    Head,
    Trace,
    Connect,
    Patch,
}

impl Method {
    /// Returns the lowercase representation of the [Method], as used in the
    /// `(request-target)` pseudo-header.
    pub fn lowercase(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Connect => "connect",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Methods whose body is hashed and whose body headers are signed.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// Returned when parsing a method name that is not one of the standard HTTP methods.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("Unrecognized HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPTIONS" => Ok(Self::Options),
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            "PATCH" => Ok(Self::Patch),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Adds support for signing requests from the [http](https://crates.io/crates/http)
/// crate through [HttpRequestAccessor](http_support::HttpRequestAccessor).
///
/// Requires the `http` feature to be enabled.
#[cfg(feature = "http")]
pub mod http_support {
    use http::{HeaderValue, header::HeaderName};
    use percent_encoding::percent_decode_str;

    use super::{Method, QueryParam, RequestAccessor, UnknownMethod};

    /// Borrows an [http::Request] for signing. The URL and query parameters are
    /// snapshotted from the request URI when the accessor is created; a request in
    /// origin-form takes its authority from the `Host` header.
    pub struct HttpRequestAccessor<'request, Body> {
        request: &'request mut ::http::Request<Body>,
        method: Method,
        url: String,
        parameters: Vec<QueryParam>,
    }

    impl<'request, Body: AsRef<[u8]>> HttpRequestAccessor<'request, Body> {
        pub fn new(request: &'request mut ::http::Request<Body>) -> Result<Self, UnknownMethod> {
            let method: Method = request.method().as_str().parse()?;
            let uri = request.uri();
            let authority = uri.authority().map(|authority| authority.as_str().to_string())
                .or_else(|| request.headers().get(::http::header::HOST)
                    .and_then(|host| host.to_str().ok())
                    .map(str::to_string));
            let url = match authority {
                Some(authority) => format!(
                    "{}://{}{}",
                    uri.scheme_str().unwrap_or("https"),
                    authority,
                    uri.path()),
                None => uri.path().to_string(),
            };
            let parameters = uri.query()
                .map(parse_query)
                .unwrap_or_default();
            Ok(Self {
                request,
                method,
                url,
                parameters,
            })
        }
    }

    fn parse_query(query: &str) -> Vec<QueryParam> {
        query.split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                // Names are signed verbatim, so they keep their wire encoding.
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                QueryParam::new(name, percent_decode_str(value).decode_utf8_lossy())
            })
            .collect()
    }

    impl<'request, Body: AsRef<[u8]>> RequestAccessor for HttpRequestAccessor<'request, Body> {
        type HeaderIter<'a> = HeaderIter<'a> where Self: 'a;

        fn method(&self) -> Method {
            self.method
        }

        fn url(&self) -> &str {
            &self.url
        }

        fn body(&self) -> &[u8] {
            self.request.body().as_ref()
        }

        fn header(&self, name: &str) -> Option<&str> {
            // HeaderMap lookups by &str are already case-insensitive.
            self.request.headers().get(name).and_then(|value| value.to_str().ok())
        }

        fn headers(&self) -> Self::HeaderIter<'_> {
            HeaderIter { iter: self.request.headers().iter() }
        }

        fn set_header(&mut self, name: &str, value: &str) {
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    self.request.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = name, "Skipping header that is not valid for the http crate"),
            }
        }

        fn parameters(&self) -> &[QueryParam] {
            &self.parameters
        }
    }

    /// Iterator over the headers of an [http::Request], skipping values that are not
    /// visible ASCII.
    pub struct HeaderIter<'a> {
        iter: ::http::header::Iter<'a, HeaderValue>,
    }

    impl<'a> Iterator for HeaderIter<'a> {
        type Item = (&'a str, &'a str);

        fn next(&mut self) -> Option<Self::Item> {
            for (name, value) in self.iter.by_ref() {
                if let Ok(value) = value.to_str() {
                    return Some((name.as_str(), value));
                }
            }
            None
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case_and_first_match_wins() {
        let mut request = OwnedRequest::new(Method::Get, "https://example.com/");
        request.headers.push(("Content-Type".to_string(), "text/plain".to_string()));
        request.headers.push(("content-type".to_string(), "application/json".to_string()));
        assert_eq!(request.header("CONTENT-TYPE"), Some("text/plain"));
    }

    #[test]
    fn set_header_replaces_existing_value_in_place() {
        let mut request = OwnedRequest::new(Method::Post, "https://example.com/")
            .with_header("X-Date", "a")
            .with_header("Content-Type", "text/plain");
        request.set_header("x-date", "b");
        let headers: Vec<_> = request.headers().collect();
        assert_eq!(headers, vec![("X-Date", "b"), ("Content-Type", "text/plain")]);
    }

    #[test]
    fn has_header_sees_empty_values() {
        let request = OwnedRequest::new(Method::Get, "https://example.com/")
            .with_header("date", "");
        assert!(request.has_header("Date"));
        assert!(!request.has_header("x-date"));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("patch".parse::<Method>(), Ok(Method::Patch));
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!("BREW".parse::<Method>(), Err(UnknownMethod("BREW".to_string())));
    }

    #[test]
    fn only_post_put_and_patch_carry_a_body() {
        assert!(Method::Post.carries_body());
        assert!(Method::Put.carries_body());
        assert!(Method::Patch.carries_body());
        assert!(!Method::Get.carries_body());
        assert!(!Method::Delete.carries_body());
        assert!(!Method::Head.carries_body());
    }
}
