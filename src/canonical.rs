//! Construction of the signing string.
//!
//! The signing string is one `name: value` line per signed element, joined by `\n`
//! with no trailing newline:
//!
//! ```text
//! x-date: Thu, 05 Jan 2014 21:31:40 GMT
//! (request-target): post /20160918/vcns?compartmentId=ocid1.compartment.oc1..aaa
//! host: iaas.us-ashburn-1.oraclecloud.com
//! content-length: 14
//! content-type: application/json
//! x-content-sha256: VpJwS+Z9wy4bwZyB/PY+/GO2HhzOC7mo9LHHqdC9hdY=
//! ```
//!
//! The last three lines only appear for methods that carry a body.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, trace};

use crate::error::SignError;
use crate::request::{Method, QueryParam, RequestAccessor};

/// Bytes left unescaped in query values: the unreserved set of `encodeURIComponent`.
const QUERY_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// An element that contributes to the signing string. The order of elements
/// determines both the order of lines in the signing string and the order of names
/// in the `headers` signature parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SignatureElement {
    /// The `(request-target)` pseudo-header: lowercase method, a space, the URL path
    /// and the encoded query string.
    RequestTarget,

    /// The `host` element, taken from the URL authority rather than from a header.
    Host,

    /// The `content-length` element, computed from the body length in bytes.
    ContentLength,

    /// A header read from the request by (lowercase) name.
    Header(&'static str),
}

impl SignatureElement {
    /// The name used for this element in the signing string and `headers` parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestTarget => "(request-target)",
            Self::Host => "host",
            Self::ContentLength => "content-length",
            Self::Header(name) => *name,
        }
    }
}

static BASIC_SIGNATURE_ELEMENTS: [SignatureElement; 3] = [
    SignatureElement::Header("date"),
    SignatureElement::RequestTarget,
    SignatureElement::Host,
];

static EXTENDED_SIGNATURE_ELEMENTS: [SignatureElement; 6] = [
    SignatureElement::Header("date"),
    SignatureElement::RequestTarget,
    SignatureElement::Host,
    SignatureElement::ContentLength,
    SignatureElement::Header("content-type"),
    SignatureElement::Header("x-content-sha256"),
];

/// Chooses the ordered elements to sign for a request.
///
/// When an `x-date` header is present, it is signed in place of `date`, even if
/// `date` is also present.
pub fn signature_elements<R: RequestAccessor>(request: &R) -> Vec<SignatureElement> {
    let mut elements = if request.method().carries_body() {
        EXTENDED_SIGNATURE_ELEMENTS.to_vec()
    } else {
        BASIC_SIGNATURE_ELEMENTS.to_vec()
    };
    if request.has_header("x-date") {
        elements[0] = SignatureElement::Header("x-date");
    }
    elements
}

/// The authority and path of a request URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlParts {
    /// Everything between `scheme://` and the path, or `None` if the URL has no
    /// authority.
    pub host: Option<String>,
    /// Everything after the authority, excluding any fragment. Never empty.
    pub path: String,
}

/// Splits `scheme://authority/path?query#fragment` into authority and path-and-query.
///
/// A URL without a scheme is treated as a bare path with no authority.
pub fn split_url(url: &str) -> UrlParts {
    let url = url.split('#').next().unwrap_or_default();
    let (host, rest) = match url.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains('/') => {
            let end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
            let host = &rest[..end];
            (Some(host).filter(|host| !host.is_empty()), &rest[end..])
        }
        _ => (None, url),
    };
    let path = if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    };
    UrlParts {
        host: host.map(str::to_string),
        path,
    }
}

/// Encodes query parameters as `name=value` pairs joined by `&`. Values are
/// percent-encoded like `encodeURIComponent`; names are emitted verbatim.
pub fn encode_query(parameters: &[QueryParam]) -> String {
    parameters.iter()
        .map(|param| format!("{}={}", param.name, utf8_percent_encode(&param.value, QUERY_VALUE_SET)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the `(request-target)` value: lowercase method, a space, the path, and the
/// encoded parameters if there are any.
///
/// Parameters normally start a new query with `?`. If the URL path already carries a
/// query, they are appended to it with `&` so the target stays a single valid query.
pub fn request_target(method: Method, path: &str, parameters: &[QueryParam]) -> String {
    let mut target = format!("{} {}", method.lowercase(), path);
    if !parameters.is_empty() {
        // Never emit a second '?' into an existing query.
        target.push(if path.contains('?') { '&' } else { '?' });
        target.push_str(&encode_query(parameters));
    }
    target
}

/// Everything derived from a request in order to sign it. Built fresh for every
/// signing call.
#[derive(Clone, Debug)]
pub struct SigningContext {
    pub elements: Vec<SignatureElement>,
    pub url: UrlParts,
    pub signing_string: String,
}

impl SigningContext {
    /// The signed element names joined by single spaces, as used in the `headers`
    /// signature parameter.
    pub fn header_list(&self) -> String {
        self.elements.iter()
            .map(SignatureElement::name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds the signing string for a request whose headers have already been
/// normalized.
///
/// Fails with [SignError::MissingHeader] if a signed header is absent or empty, or if
/// the URL has no authority to sign as `host`.
pub fn build_signing_context<R: RequestAccessor>(request: &R) -> Result<SigningContext, SignError> {
    let elements = signature_elements(request);
    let url = split_url(request.url());
    debug!(host = ?url.host, path = %url.path, "Decomposed request URL");

    let mut lines = Vec::with_capacity(elements.len());
    for element in &elements {
        let line = match element {
            SignatureElement::RequestTarget => {
                let target = request_target(request.method(), &url.path, request.parameters());
                debug!(request_target = %target, "Built request target");
                format!("(request-target): {}", target)
            }
            SignatureElement::Host => match &url.host {
                Some(host) => format!("host: {}", host),
                None => return Err(SignError::MissingHeader("host".to_string())),
            },
            SignatureElement::ContentLength => format!("content-length: {}", request.body().len()),
            SignatureElement::Header(name) => {
                trace!(header = name, "Reading header to sign");
                match request.header(name).filter(|value| !value.is_empty()) {
                    Some(value) => format!("{}: {}", name, value),
                    None => return Err(SignError::MissingHeader(name.to_string())),
                }
            }
        };
        lines.push(line);
    }

    let signing_string = lines.join("\n");
    debug!(signing_string = %signing_string, "Built signing string");
    Ok(SigningContext {
        elements,
        url,
        signing_string,
    })
}
