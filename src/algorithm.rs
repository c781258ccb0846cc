use std::fmt::Debug;

use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::RsaKeyPair;
use tracing::debug;

use crate::error::SignError;

/// The signature algorithm used to sign the signing string. The algorithm determines
/// the value of the "algorithm" signature parameter and how the signature bytes are
/// produced. All algorithms share the same canonicalization, so this trait does not
/// include that feature.
pub trait SignatureAlgorithm {
    /// The name which will be used for the "algorithm" signature parameter.
    fn name(&self) -> &str;

    /// Digitally sign a block of data.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError>;

    /// Sign a block of data and base64-encode the signature.
    fn sign_base64(&self, data: &[u8]) -> Result<String, SignError> {
        Ok(base64::encode(self.sign(data)?))
    }
}

/// RSASSA-PKCS1-v1_5 with SHA-256, the only algorithm the `Signature` scheme accepts.
pub struct RsaSha256<Rand = SystemRandom> {
    key: RsaKeyPair,
    random: Rand,
}

impl<Rand> RsaSha256<Rand> {
    pub fn new(key: RsaKeyPair, random: Rand) -> Self {
        Self {
            key,
            random
        }
    }
}

impl RsaSha256<SystemRandom> {
    /// Parses PEM-encoded RSA key material. Both PKCS#1 (`RSA PRIVATE KEY`) and
    /// unencrypted PKCS#8 (`PRIVATE KEY`) blocks are accepted.
    pub fn from_pem(pem: &[u8]) -> Result<Self, SignError> {
        let block = pem::parse(pem)
            .map_err(|err| SignError::KeyParse(format!("Invalid PEM: {}", err)))?;
        let key = match block.tag() {
            "RSA PRIVATE KEY" => RsaKeyPair::from_der(block.contents()),
            "PRIVATE KEY" => RsaKeyPair::from_pkcs8(block.contents()),
            "ENCRYPTED PRIVATE KEY" => {
                return Err(SignError::KeyParse("Encrypted private keys are not supported".to_string()))
            }
            tag => return Err(SignError::KeyParse(format!("Unsupported PEM block: {}", tag))),
        }.map_err(|err| SignError::KeyParse(format!("Rejected RSA key: {}", err)))?;
        debug!(modulus_bits = key.public().modulus_len() * 8, "Loaded RSA private key");
        Ok(Self::new(key, SystemRandom::new()))
    }
}

impl<Rand: SecureRandom> SignatureAlgorithm for RsaSha256<Rand> {
    fn name(&self) -> &str {
        "rsa-sha256"
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        let mut signature = vec![0u8; self.key.public().modulus_len()];
        self.key.sign(&ring::signature::RSA_PKCS1_SHA256, &self.random, data, &mut signature)
            .map_err(|_err| SignError::Signing("Failed to compute RSA_PKCS1_SHA256".to_string()))?;
        Ok(signature)
    }
}

impl<Rand> Debug for RsaSha256<Rand> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSha256")
            .field("key", &self.key)
            .finish()
    }
}
