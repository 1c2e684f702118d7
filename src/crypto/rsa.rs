//! RSA signing and verification capabilities.

use alloc::{string::String, vec::Vec};
use core::fmt;

use ::rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::InvalidKeyError;
use crate::{
    jwa::{RsaSigning, RsassaPkcs1V1_5, RsassaPss, SignatureAlgorithm},
    jws::{JwsSigner, JwsVerifier},
};

fn digest(algorithm: RsaSigning, input: &[u8]) -> Vec<u8> {
    match algorithm {
        RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs256) | RsaSigning::Pss(RsassaPss::Ps256) => {
            Sha256::digest(input).to_vec()
        }
        RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs384) | RsaSigning::Pss(RsassaPss::Ps384) => {
            Sha384::digest(input).to_vec()
        }
        RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs512) | RsaSigning::Pss(RsassaPss::Ps512) => {
            Sha512::digest(input).to_vec()
        }
    }
}

fn check_algorithm(algorithm: SignatureAlgorithm) -> Result<RsaSigning, InvalidKeyError> {
    match algorithm {
        SignatureAlgorithm::Rsa(algorithm) => Ok(algorithm),
        other => Err(InvalidKeyError::UnsupportedAlgorithm(other)),
    }
}

/// A [`JwsSigner`] for the RS256/RS384/RS512 and PS256/PS384/PS512
/// algorithms.
///
/// The PSS variants draw a fresh random salt per signature; the PKCS#1 v1.5
/// variants are deterministic.
pub struct RsaSigner {
    key: RsaPrivateKey,
    algorithm: RsaSigning,
    key_id: Option<String>,
}

impl RsaSigner {
    /// Creates a signer from an RSA private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an RSA signing algorithm.
    pub fn new(key: RsaPrivateKey, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        Ok(Self {
            key,
            algorithm: check_algorithm(algorithm)?,
            key_id: None,
        })
    }

    /// Attaches a key id to advertise in produced headers.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl JwsSigner for RsaSigner {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Rsa(self.algorithm)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, signature::Error> {
        let hashed = digest(self.algorithm, signing_input);
        let mut rng = rand_core::OsRng;

        let result = match self.algorithm {
            RsaSigning::Pss(pss) => match pss {
                RsassaPss::Ps256 => {
                    self.key
                        .sign_with_rng(&mut rng, Pss::new::<Sha256>(), &hashed)
                }
                RsassaPss::Ps384 => {
                    self.key
                        .sign_with_rng(&mut rng, Pss::new::<Sha384>(), &hashed)
                }
                RsassaPss::Ps512 => {
                    self.key
                        .sign_with_rng(&mut rng, Pss::new::<Sha512>(), &hashed)
                }
            },
            RsaSigning::Pkcs1V1_5(pkcs) => match pkcs {
                RsassaPkcs1V1_5::Rs256 => {
                    self.key
                        .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha256>(), &hashed)
                }
                RsassaPkcs1V1_5::Rs384 => {
                    self.key
                        .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha384>(), &hashed)
                }
                RsassaPkcs1V1_5::Rs512 => {
                    self.key
                        .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha512>(), &hashed)
                }
            },
        };

        result.map_err(|_| signature::Error::new())
    }
}

/// A [`JwsVerifier`] for the RS256/RS384/RS512 and PS256/PS384/PS512
/// algorithms.
#[derive(Clone)]
pub struct RsaVerifier {
    key: RsaPublicKey,
    algorithm: RsaSigning,
    key_id: Option<String>,
}

impl RsaVerifier {
    /// Creates a verifier from an RSA public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is not an RSA signing algorithm.
    pub fn new(key: RsaPublicKey, algorithm: SignatureAlgorithm) -> Result<Self, InvalidKeyError> {
        Ok(Self {
            key,
            algorithm: check_algorithm(algorithm)?,
            key_id: None,
        })
    }

    /// Attaches the key id this verifier is bound to.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl fmt::Debug for RsaVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifier")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl JwsVerifier for RsaVerifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Rsa(self.algorithm)
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8]) -> bool {
        let hashed = digest(self.algorithm, signing_input);

        let result = match self.algorithm {
            RsaSigning::Pss(pss) => match pss {
                RsassaPss::Ps256 => self.key.verify(Pss::new::<Sha256>(), &hashed, signature),
                RsassaPss::Ps384 => self.key.verify(Pss::new::<Sha384>(), &hashed, signature),
                RsassaPss::Ps512 => self.key.verify(Pss::new::<Sha512>(), &hashed, signature),
            },
            RsaSigning::Pkcs1V1_5(pkcs) => match pkcs {
                RsassaPkcs1V1_5::Rs256 => {
                    self.key
                        .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
                }
                RsassaPkcs1V1_5::Rs384 => {
                    self.key
                        .verify(Pkcs1v15Sign::new::<Sha384>(), &hashed, signature)
                }
                RsassaPkcs1V1_5::Rs512 => {
                    self.key
                        .verify(Pkcs1v15Sign::new::<Sha512>(), &hashed, signature)
                }
            },
        };

        result.is_ok()
    }
}
