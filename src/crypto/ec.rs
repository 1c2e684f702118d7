//! ECDSA signing and verification capabilities.
//!
//! JWS transmits ECDSA signatures as the fixed-size `r || s` concatenation
//! defined in [section 3.4 of RFC 7518], not as ASN.1 DER.
//!
//! [section 3.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.4>

use alloc::{string::String, vec::Vec};
use core::fmt;

use rand_core::OsRng;
use signature::{RandomizedSigner, Verifier};

use super::InvalidKeyError;
use crate::{
    jwa::{EcDsa, SignatureAlgorithm},
    jws::{JwsSigner, JwsVerifier},
};

enum SigningKey {
    Es256(p256::ecdsa::SigningKey),
    Es384(p384::ecdsa::SigningKey),
}

/// A [`JwsSigner`] for the ES256 and ES384 algorithms.
///
/// ES512 cannot be constructed, see [`EcDsa::Es512`].
pub struct EcdsaSigner {
    inner: SigningKey,
    key_id: Option<String>,
}

impl EcdsaSigner {
    /// Creates an ES256 signer from a P-256 signing key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the algorithm is ES256.
    pub fn new_p256(
        key: p256::ecdsa::SigningKey,
        algorithm: SignatureAlgorithm,
    ) -> Result<Self, InvalidKeyError> {
        match algorithm {
            SignatureAlgorithm::EcDsa(EcDsa::Es256) => Ok(Self {
                inner: SigningKey::Es256(key),
                key_id: None,
            }),
            other => Err(InvalidKeyError::UnsupportedAlgorithm(other)),
        }
    }

    /// Creates an ES384 signer from a P-384 signing key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the algorithm is ES384.
    pub fn new_p384(
        key: p384::ecdsa::SigningKey,
        algorithm: SignatureAlgorithm,
    ) -> Result<Self, InvalidKeyError> {
        match algorithm {
            SignatureAlgorithm::EcDsa(EcDsa::Es384) => Ok(Self {
                inner: SigningKey::Es384(key),
                key_id: None,
            }),
            other => Err(InvalidKeyError::UnsupportedAlgorithm(other)),
        }
    }

    /// Attaches a key id to advertise in produced headers.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaSigner")
            .field("algorithm", &JwsSigner::algorithm(self))
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl JwsSigner for EcdsaSigner {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self.inner {
            SigningKey::Es256(_) => SignatureAlgorithm::EcDsa(EcDsa::Es256),
            SigningKey::Es384(_) => SignatureAlgorithm::EcDsa(EcDsa::Es384),
        }
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, signature::Error> {
        match &self.inner {
            SigningKey::Es256(key) => {
                let signature: p256::ecdsa::Signature =
                    key.try_sign_with_rng(&mut OsRng, signing_input)?;
                Ok(signature.to_bytes().to_vec())
            }
            SigningKey::Es384(key) => {
                let signature: p384::ecdsa::Signature =
                    key.try_sign_with_rng(&mut OsRng, signing_input)?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}

#[derive(Debug, Clone)]
enum VerifyingKey {
    Es256(p256::ecdsa::VerifyingKey),
    Es384(p384::ecdsa::VerifyingKey),
}

/// A [`JwsVerifier`] for the ES256 and ES384 algorithms.
#[derive(Debug, Clone)]
pub struct EcdsaVerifier {
    inner: VerifyingKey,
    key_id: Option<String>,
}

impl EcdsaVerifier {
    /// Creates an ES256 verifier from a P-256 verifying key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the algorithm is ES256.
    pub fn new_p256(
        key: p256::ecdsa::VerifyingKey,
        algorithm: SignatureAlgorithm,
    ) -> Result<Self, InvalidKeyError> {
        match algorithm {
            SignatureAlgorithm::EcDsa(EcDsa::Es256) => Ok(Self {
                inner: VerifyingKey::Es256(key),
                key_id: None,
            }),
            other => Err(InvalidKeyError::UnsupportedAlgorithm(other)),
        }
    }

    /// Creates an ES384 verifier from a P-384 verifying key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the algorithm is ES384.
    pub fn new_p384(
        key: p384::ecdsa::VerifyingKey,
        algorithm: SignatureAlgorithm,
    ) -> Result<Self, InvalidKeyError> {
        match algorithm {
            SignatureAlgorithm::EcDsa(EcDsa::Es384) => Ok(Self {
                inner: VerifyingKey::Es384(key),
                key_id: None,
            }),
            other => Err(InvalidKeyError::UnsupportedAlgorithm(other)),
        }
    }

    /// Attaches the key id this verifier is bound to.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl JwsVerifier for EcdsaVerifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self.inner {
            VerifyingKey::Es256(_) => SignatureAlgorithm::EcDsa(EcDsa::Es256),
            VerifyingKey::Es384(_) => SignatureAlgorithm::EcDsa(EcDsa::Es384),
        }
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        // a signature of the wrong length is rejected here, it never reaches
        // the curve arithmetic
        match &self.inner {
            VerifyingKey::Es256(key) => {
                let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                key.verify(signing_input, &signature).is_ok()
            }
            VerifyingKey::Es384(key) => {
                let Ok(signature) = p384::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                key.verify(signing_input, &signature).is_ok()
            }
        }
    }
}
