//! Fills in the headers every signed request needs before the signing string is built.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::request::RequestAccessor;

/// Content type assumed when the caller did not set one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Name of the timestamp header inserted when the request carries neither `date` nor
/// `x-date`. It is `x-date` so the canonical builder's substitution rule picks it up.
pub const DEFAULT_DATE_HEADER: &str = "x-date";

/// Formats a timestamp as an RFC 1123 HTTP-date, e.g. `Thu, 02 Jan 2014 21:31:40 GMT`.
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Ensures the request has a `content-type` header and a timestamp header.
///
/// Existing headers are never replaced or removed. When neither `date` nor `x-date`
/// is present, [DEFAULT_DATE_HEADER] is set to `now`.
pub fn normalize_headers<R: RequestAccessor>(request: &mut R, now: DateTime<Utc>) {
    if !request.has_header("content-type") {
        debug!(content_type = DEFAULT_CONTENT_TYPE, "Setting content-type header");
        request.set_header("content-type", DEFAULT_CONTENT_TYPE);
    }

    if !request.has_header("date") && !request.has_header("x-date") {
        let date = format_http_date(now);
        debug!(header = DEFAULT_DATE_HEADER, date = %date, "Setting date header");
        request.set_header(DEFAULT_DATE_HEADER, &date);
    }
}
