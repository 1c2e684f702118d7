//! Concrete [`JwsSigner`](crate::jws::JwsSigner) and
//! [`JwsVerifier`](crate::jws::JwsVerifier) capabilities for the registered
//! algorithm families, backed by the RustCrypto crates.
//!
//! Each capability binds one key to one algorithm at construction time and
//! fails with an [`InvalidKeyError`] when key and algorithm don't belong
//! together. The unsecured (`none`) capability lives in its own pair of
//! types and is never implied by any of the real ones.

mod ec;
mod hmac;
mod none;
mod rsa;

use thiserror::Error;

#[doc(inline)]
pub use self::{
    ec::{EcdsaSigner, EcdsaVerifier},
    hmac::{HmacSigner, HmacVerifier},
    none::{NoneSigner, NoneVerifier},
    rsa::{RsaSigner, RsaVerifier},
};
use crate::jwa::SignatureAlgorithm;

/// An error returned when a key cannot be bound to the requested algorithm.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvalidKeyError {
    /// The key type cannot produce or check signatures for this algorithm.
    #[error("the key cannot be used with the `{0}` algorithm")]
    UnsupportedAlgorithm(SignatureAlgorithm),
    /// The key is shorter than the algorithm allows.
    #[error("the key is too short for `{algorithm}`: got {actual} bytes, need at least {expected}")]
    WeakKey {
        /// The requested algorithm.
        algorithm: SignatureAlgorithm,
        /// The minimum key size in bytes.
        expected: usize,
        /// The size of the supplied key in bytes.
        actual: usize,
    },
    /// An encoded key was not valid base64url.
    #[error("the encoded key is not valid base64url")]
    InvalidEncoding,
}
