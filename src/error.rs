//! Error types for request signing and signer configuration.

use std::path::PathBuf;

use crate::credential::CredentialField;

/// Errors that can occur while signing a request.
///
/// None of these are retried internally. Header mutations applied before the
/// failure (defaulted timestamp, body headers) are left on the request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// A credential field was empty when signing was attempted.
    #[error("{0} not set")]
    Configuration(CredentialField),

    /// A header in the signed-header list had no value at signing time.
    #[error("Required header has no value: {0}")]
    MissingHeader(String),

    /// The private key material could not be parsed as an RSA key.
    #[error("Failed to parse private key: {0}")]
    KeyParse(String),

    /// The RSA signing primitive failed.
    #[error("Failed to compute signature: {0}")]
    Signing(String),
}

/// Errors that can occur while loading a [`SignerProfile`](crate::config::SignerProfile).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A profile or key file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile was not valid TOML or was missing fields.
    #[error("Invalid signer profile: {0}")]
    Parse(#[from] toml::de::Error),

    /// The resolved credential failed validation.
    #[error(transparent)]
    InvalidCredential(#[from] SignError),
}
