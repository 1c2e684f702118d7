use thiserror::Error;

use crate::{base64_url::NoBase64UrlString, header::HeaderError, jwa::SignatureAlgorithm};

/// A structural error: the wire representation of a document is malformed.
///
/// Parse failures propagate immediately since no signature check can run
/// without a well-formed document. Verification outcomes are booleans
/// instead, see [`JwsVerifier`](crate::jws::JwsVerifier).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A compact serialization did not consist of three segments.
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),
    /// A segment was not valid base64url.
    #[error(transparent)]
    InvalidBase64(#[from] NoBase64UrlString),
    /// A header set was malformed.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// The document was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The document was valid JSON but not a JSON object.
    #[error("the document is not a JSON object")]
    NotAnObject,
    /// Both an inline payload and a detached payload were supplied.
    #[error("both an inline payload and a detached payload were supplied")]
    PayloadConflict,
    /// The document carries no payload and none was supplied out of band.
    #[error("the document is detached but no detached payload was supplied")]
    MissingPayload,
    /// The document contains no signature entry at all.
    #[error("the document contains neither a flattened signature nor a `signatures` array")]
    MissingSignatures,
    /// A member of the document has an unexpected type.
    #[error("the `{0}` member has an unexpected type")]
    InvalidMember(&'static str),
}

/// An error raised while producing a signed document.
///
/// These are caller mistakes or signer failures, not verification outcomes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// The `alg` set in the header does not match the signer.
    #[error("header algorithm ({header}) does not match the signer algorithm ({signer})")]
    AlgorithmMismatch {
        /// The algorithm asserted in the header set.
        header: SignatureAlgorithm,
        /// The algorithm the signer is bound to.
        signer: SignatureAlgorithm,
    },
    /// A parameter that drives the trust decision was put into the
    /// unprotected header set.
    #[error("the `{0}` parameter must be part of the protected header")]
    MustBeProtected(&'static str),
    /// The protected and unprotected header sets share a parameter name.
    #[error("protected and unprotected headers must be disjoint")]
    NotDisjoint,
    /// The payload cannot be transmitted unencoded in this serialization.
    #[error("the unencoded payload cannot be represented in this serialization")]
    UnencodedPayload,
    /// `b64` was set to `false` without being listed in `crit`.
    #[error("an unencoded payload requires `b64` to be listed in the `crit` header")]
    CriticalB64Missing,
    /// Signature entries over one payload disagree on the `b64` header.
    #[error("all signatures over one payload must agree on the `b64` header")]
    InconsistentPayloadEncoding,
    /// A document was requested before anything was signed.
    #[error("no signature entries: nothing was signed yet")]
    NoSignatures,
    /// A header set or document could not be serialized.
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    /// The signer failed to produce a signature.
    #[error("signing operation failed: {0}")]
    Signature(signature::Error),
}
