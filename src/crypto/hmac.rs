//! Hmac signing and verification capabilities.

use alloc::{string::String, vec::Vec};

use ::hmac::{Hmac, Mac};
use base64ct::{Base64UrlUnpadded, Encoding};
use secrecy::{ExposeSecret, SecretSlice};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::InvalidKeyError;
use crate::{
    jwa::{self, SignatureAlgorithm},
    jws::{JwsSigner, JwsVerifier},
};

fn check_key(
    key: Vec<u8>,
    algorithm: SignatureAlgorithm,
) -> Result<(SecretSlice<u8>, jwa::Hmac), InvalidKeyError> {
    let variant = match algorithm {
        SignatureAlgorithm::Hmac(variant) => variant,
        other => return Err(InvalidKeyError::UnsupportedAlgorithm(other)),
    };

    // RFC 7518 section 3.2 forbids keys shorter than the hash output
    if key.len() < variant.minimum_key_size() {
        return Err(InvalidKeyError::WeakKey {
            algorithm: SignatureAlgorithm::Hmac(variant),
            expected: variant.minimum_key_size(),
            actual: key.len(),
        });
    }

    Ok((SecretSlice::from(key), variant))
}

fn decode_key(encoded: &str) -> Result<Vec<u8>, InvalidKeyError> {
    Base64UrlUnpadded::decode_vec(encoded).map_err(|_| InvalidKeyError::InvalidEncoding)
}

fn compute(
    key: &SecretSlice<u8>,
    variant: jwa::Hmac,
    input: &[u8],
) -> Result<Vec<u8>, signature::Error> {
    let key = key.expose_secret();

    // an HMAC accepts keys of any length, so construction only fails on a
    // pathological backend; map that onto the opaque signature error
    let tag = match variant {
        jwa::Hmac::Hs256 => {
            let mut mac = Hmac::<sha2::Sha256>::new_from_slice(key)
                .map_err(|_| signature::Error::new())?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
        jwa::Hmac::Hs384 => {
            let mut mac = Hmac::<sha2::Sha384>::new_from_slice(key)
                .map_err(|_| signature::Error::new())?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
        jwa::Hmac::Hs512 => {
            let mut mac = Hmac::<sha2::Sha512>::new_from_slice(key)
                .map_err(|_| signature::Error::new())?;
            mac.update(input);
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(tag)
}

/// A [`JwsSigner`] for the HS256, HS384 and HS512 algorithms.
///
/// The key bytes are held as a [`SecretSlice`] and zeroized on drop.
#[derive(Debug)]
pub struct HmacSigner {
    key: SecretSlice<u8>,
    variant: jwa::Hmac,
    key_id: Option<String>,
}

impl HmacSigner {
    /// Creates a signer from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an HMAC algorithm or the key
    /// is shorter than the hash output, which RFC 7518 forbids.
    pub fn new(key: impl Into<Vec<u8>>, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        let (key, variant) = check_key(key.into(), algorithm)?;
        Ok(Self {
            key,
            variant,
            key_id: None,
        })
    }

    /// Creates a signer from a base64url-encoded key.
    ///
    /// # Errors
    ///
    /// Like [`new`](Self::new); additionally fails on invalid base64url.
    pub fn from_encoded(encoded: &str, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        Self::new(decode_key(encoded)?, algorithm)
    }

    /// Attaches a key id to advertise in produced headers.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl JwsSigner for HmacSigner {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Hmac(self.variant)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, signature::Error> {
        compute(&self.key, self.variant, signing_input)
    }
}

/// A [`JwsVerifier`] for the HS256, HS384 and HS512 algorithms.
#[derive(Debug)]
pub struct HmacVerifier {
    key: SecretSlice<u8>,
    variant: jwa::Hmac,
    key_id: Option<String>,
}

impl HmacVerifier {
    /// Creates a verifier from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an HMAC algorithm or the key
    /// is shorter than the hash output.
    pub fn new(key: impl Into<Vec<u8>>, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        let (key, variant) = check_key(key.into(), algorithm)?;
        Ok(Self {
            key,
            variant,
            key_id: None,
        })
    }

    /// Creates a verifier from a base64url-encoded key.
    ///
    /// # Errors
    ///
    /// Like [`new`](Self::new); additionally fails on invalid base64url.
    pub fn from_encoded(encoded: &str, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        Self::new(decode_key(encoded)?, algorithm)
    }

    /// Attaches the key id this verifier is bound to.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl JwsVerifier for HmacVerifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Hmac(self.variant)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        let Ok(expected) = compute(&self.key, self.variant, signing_input) else {
            return false;
        };
        let expected = Zeroizing::new(expected);

        // constant time check to avoid potential leakage
        expected.ct_eq(signature).unwrap_u8() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwa::Hmac;

    #[test]
    fn rejects_short_keys() {
        let err = HmacSigner::new([0u8; 16], SignatureAlgorithm::Hmac(Hmac::Hs256));
        assert!(matches!(err, Err(InvalidKeyError::WeakKey { .. })));
    }

    #[test]
    fn rejects_non_hmac_algorithms() {
        let err = HmacSigner::new([0u8; 32], SignatureAlgorithm::None);
        assert!(matches!(err, Err(InvalidKeyError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn sign_verify_roundtrip() {
        let signer = HmacSigner::new([7u8; 32], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();
        let verifier = HmacVerifier::new([7u8; 32], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();

        let sig = signer.sign(b"input").unwrap();
        assert!(verifier.verify(b"input", &sig));
        assert!(!verifier.verify(b"inpux", &sig));
        assert!(!verifier.verify(b"input", &sig[..sig.len() - 1]));
    }
}
