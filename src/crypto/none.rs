//! The unsecured (`none`) capabilities as defined in [section 3.6 of RFC
//! 7518].
//!
//! Unsecured documents have an empty signature and no integrity protection.
//! Accepting them is an explicit opt-in: only a [`NoneVerifier`] ever
//! verifies an `alg: none` document, and every real verifier rejects one.
//!
//! [section 3.6 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.6>

use alloc::vec::Vec;

use crate::{
    jwa::SignatureAlgorithm,
    jws::{JwsSigner, JwsVerifier},
};

/// Produces unsecured documents: the signature is always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneSigner;

impl JwsSigner for NoneSigner {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::None
    }

    fn sign(&self, _signing_input: &[u8]) -> Result<Vec<u8>, signature::Error> {
        Ok(Vec::new())
    }
}

/// Accepts unsecured documents, and only those.
///
/// Verification succeeds exactly when the signature is zero-length; a
/// document that still carries real signature bytes under a rewritten
/// `alg: none` header is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneVerifier;

impl JwsVerifier for NoneVerifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::None
    }

    fn verify(&self, _signing_input: &[u8], signature: &[u8]) -> bool {
        signature.is_empty()
    }
}
