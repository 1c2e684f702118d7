//! Implementation of JSON Web Signature (JWS) as defined in [RFC 7515]
//!
//! Producers build signed documents from a payload, one or more header sets
//! and [`JwsSigner`] capabilities; consumers parse documents back and check
//! them against [`JwsVerifier`] capabilities. The compact serialization lives
//! in [`compact`], the flattened and general JSON serializations in [`json`].
//!
//! [RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515>

pub mod compact;
pub mod json;

mod error;
mod verify;

use alloc::vec::Vec;

#[doc(inline)]
pub use self::error::{ParseError, SignError};
pub(crate) use self::verify::accepts_entry;
pub use self::verify::validate_critical_headers;
use crate::jwa::SignatureAlgorithm;

/// A capability that can produce signatures over JWS signing input.
///
/// A signer is bound to one [algorithm](SignatureAlgorithm) and one key; the
/// algorithm ends up as the `alg` parameter of the protected header when a
/// producer fills it in. Signatures are deterministic or randomized per
/// algorithm family (HMAC and RSASSA-PKCS1-v1_5 are deterministic, RSASSA-PSS
/// and ECDSA draw fresh randomness per call).
pub trait JwsSigner {
    /// The algorithm this signer produces signatures with.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// The key id to advertise for this signer, if any.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Signs the given signing input.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing operation itself fails, e.g. because
    /// the backing key was rejected by the underlying implementation.
    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, signature::Error>;
}

/// A capability that can check signatures over JWS signing input.
///
/// Verification is a boolean outcome: a malformed signature length, a wrong
/// key and a tampered payload all converge on `false`, and implementations
/// must not panic on well-formed-but-invalid input.
///
/// A verifier is bound to one [algorithm](SignatureAlgorithm); consumers
/// compare the `alg` asserted inside the signed header against that binding
/// before any signature math runs, so a document rewritten to claim a
/// different algorithm (notably `none`) fails closed.
pub trait JwsVerifier {
    /// The algorithm this verifier accepts.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// The key id this verifier is bound to, if any.
    ///
    /// Used by multi-signature documents to match verifiers to signature
    /// entries without trial verification.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Checks the signature over the given signing input.
    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool;
}
