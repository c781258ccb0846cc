//! Body integrity headers for methods that carry a body.

use ring::digest::{digest, SHA256};
use tracing::debug;

use crate::request::RequestAccessor;

/// Base64 of the SHA-256 digest of `body`. An empty body hashes to the digest of
/// zero bytes.
pub fn content_sha256(body: &[u8]) -> String {
    base64::encode(digest(&SHA256, body).as_ref())
}

/// Sets `content-length` and `x-content-sha256` from the raw body for POST, PUT and
/// PATCH requests, overwriting any values already present. Other methods are left
/// untouched.
pub fn apply_body_headers<R: RequestAccessor>(request: &mut R) {
    if !request.method().carries_body() {
        return;
    }

    let length = request.body().len().to_string();
    let hash = content_sha256(request.body());
    debug!(content_length = %length, x_content_sha256 = %hash, "Computed body headers");
    request.set_header("content-length", &length);
    request.set_header("x-content-sha256", &hash);
}
