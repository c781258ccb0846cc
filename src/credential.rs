//! The signing credential and the providers that supply it.

use std::fmt;

use crate::error::SignError;

/// Names one of the five fields of a [`Credential`], used to report which one is unset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CredentialField {
    Version,
    TenancyId,
    UserId,
    KeyFingerprint,
    PrivateKey,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Version => "API version",
            Self::TenancyId => "Tenancy ID",
            Self::UserId => "User ID",
            Self::KeyFingerprint => "Public key fingerprint",
            Self::PrivateKey => "Private key",
        })
    }
}

/// Everything needed to sign a request on behalf of one API key.
///
/// The private key is PEM-encoded RSA key material, either PKCS#1
/// (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`).
#[derive(Clone, Eq, PartialEq)]
pub struct Credential {
    version: String,
    tenancy_id: String,
    user_id: String,
    key_fingerprint: String,
    private_key: Vec<u8>,
}

impl Credential {
    pub fn new(
            version: impl Into<String>,
            tenancy_id: impl Into<String>,
            user_id: impl Into<String>,
            key_fingerprint: impl Into<String>,
            private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            version: version.into(),
            tenancy_id: tenancy_id.into(),
            user_id: user_id.into(),
            key_fingerprint: key_fingerprint.into(),
            private_key: private_key.into(),
        }
    }

    /// Checks that every field is non-empty, reporting the first empty one.
    pub fn validate(&self) -> Result<(), SignError> {
        let fields = [
            (CredentialField::Version, self.version.is_empty()),
            (CredentialField::TenancyId, self.tenancy_id.is_empty()),
            (CredentialField::UserId, self.user_id.is_empty()),
            (CredentialField::KeyFingerprint, self.key_fingerprint.is_empty()),
            (CredentialField::PrivateKey, self.private_key.is_empty()),
        ];
        match fields.iter().find(|(_, empty)| *empty) {
            Some((field, _)) => Err(SignError::Configuration(*field)),
            None => Ok(()),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn tenancy_id(&self) -> &str {
        &self.tenancy_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn key_fingerprint(&self) -> &str {
        &self.key_fingerprint
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// The `keyId` signature parameter: `<tenancy>/<user>/<fingerprint>`.
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy_id, self.user_id, self.key_fingerprint)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("version", &self.version)
            .field("tenancy_id", &self.tenancy_id)
            .field("user_id", &self.user_id)
            .field("key_fingerprint", &self.key_fingerprint)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Supplies the credential used for signing.
///
/// Implementations may read a profile file, a secret store, or hold the
/// credential in memory.
pub trait CredentialProvider {
    /// Returns a validated credential.
    fn credential(&self) -> Result<Credential, SignError>;
}

/// Holds a single credential in memory.
#[derive(Clone, Debug)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn credential(&self) -> Result<Credential, SignError> {
        self.credential.validate()?;
        Ok(self.credential.clone())
    }
}
