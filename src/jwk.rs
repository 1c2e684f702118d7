//! The external key-provider interface.
//!
//! Key storage, key-set management and certificate chain validation are the
//! business of an external collaborator. The engine only needs to resolve a
//! key id to a key handle and to the algorithm the key is meant for; the
//! latter is what a caller cross-checks against the `alg` a consumer parsed
//! out of a signed header before trusting a verifier with the document.

use alloc::string::String;

use thiserror::Error;

use crate::jwa::SignatureAlgorithm;

/// Resolves key ids to key handles and their intended algorithms.
///
/// Absence of a key is always a caller-visible error, never a silent empty
/// result.
pub trait KeyProvider {
    /// The key handle type this provider hands out.
    ///
    /// Opaque to the engine; a caller turns it into a concrete
    /// [`JwsSigner`](crate::jws::JwsSigner) or
    /// [`JwsVerifier`](crate::jws::JwsVerifier) capability.
    type Key;

    /// Looks up the key handle for the given key id.
    ///
    /// # Errors
    ///
    /// Returns an error if no key exists for the id or the key cannot be
    /// retrieved.
    fn key(&self, key_id: &str) -> Result<Self::Key, KeyProviderError>;

    /// Looks up the algorithm the key with the given id is meant for.
    ///
    /// # Errors
    ///
    /// Returns an error if no key exists for the id or the key cannot be
    /// retrieved.
    fn algorithm(&self, key_id: &str) -> Result<SignatureAlgorithm, KeyProviderError>;
}

/// An error returned by a [`KeyProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KeyProviderError {
    /// No key exists for the given key id.
    #[error("no key found for key id `{0}`")]
    UnknownKeyId(String),
    /// The key exists but could not be retrieved.
    #[error("the key for key id `{0}` is unavailable")]
    Unavailable(String),
}
