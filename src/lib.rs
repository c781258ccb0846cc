//! Signs HTTP requests for the Oracle Cloud Infrastructure `Signature` authorization
//! scheme, a variant of the cavage HTTP signatures draft.
//!
//! ```no_run
//! use oci_http_sign::{Credential, Method, OwnedRequest, RequestSigner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = std::fs::read("/home/scott/.oci/my_key.pem")?;
//! let signer = RequestSigner::new(Credential::new(
//!     "1",
//!     "ocid1.tenancy.oc1..aaaaaaaap",
//!     "ocid1.user.oc1..aaaaaaaas",
//!     "d1:b2:32:53:d3:5f:cf:68:2d:6f:8b:5f:77:8f:07",
//!     key))?;
//! let mut request = OwnedRequest::new(Method::Get, "https://iaas.us-ashburn-1.oraclecloud.com/20160918/vcns")
//!     .with_parameter("compartmentId", "ocid1.compartment.oc1..aaaaaaaa");
//! signer.sign_request(&mut request)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod algorithm;
pub mod canonical;
pub mod config;
pub mod credential;
pub mod digest;
mod error;
pub mod normalize;
pub mod request;
mod signature;

pub use algorithm::{
    RsaSha256,
    SignatureAlgorithm,
};

pub use credential::{
    Credential,
    CredentialField,
    CredentialProvider,
    StaticCredentialProvider,
};

pub use config::SignerProfile;

pub use error::{
    ConfigError,
    SignError,
};

pub use request::{
    Method,
    OwnedRequest,
    QueryParam,
    RequestAccessor,
};

pub use signature::{
    RequestSigner,
    format_authorization,
    sign,
};
