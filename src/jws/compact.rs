//! The compact serialization as defined in [section 7.1 of RFC 7515]:
//! `BASE64URL(UTF8(protected)) '.' BASE64URL(payload) '.' BASE64URL(signature)`,
//! with the middle segment empty in detached mode and transmitted verbatim
//! when the `b64` header (RFC 7797) disables payload encoding.
//!
//! [section 7.1 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-7.1>

use alloc::{format, string::String, vec::Vec};
use core::str::FromStr;

use super::{
    accepts_entry, validate_critical_headers, JwsSigner, JwsVerifier, ParseError, SignError,
};
use crate::{
    base64_url::Base64UrlString,
    header::{
        parse::{parse_protected, ParsedProtected},
        JwsHeaders,
    },
    jwa::SignatureAlgorithm,
};

/// Produces a compact JWS from one protected header set and one payload.
///
/// A fresh producer is constructed per signing operation; it holds no state
/// beyond the document under construction.
///
/// # Example
///
/// ```
/// use jws::{crypto::HmacSigner, jwa::{Hmac, SignatureAlgorithm}, JwsCompactProducer, JwsHeaders};
///
/// # fn main() -> Result<(), Box<dyn core::error::Error>> {
/// let headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
/// let signer = HmacSigner::new([0x42; 32], SignatureAlgorithm::Hmac(Hmac::Hs256))?;
///
/// let mut producer = JwsCompactProducer::with_headers(headers, &b"hello"[..]);
/// let compact = producer.sign_with(&signer)?;
/// assert_eq!(compact.split('.').count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JwsCompactProducer {
    headers: JwsHeaders,
    payload: Vec<u8>,
    detached: bool,
}

impl JwsCompactProducer {
    /// Creates a producer for the given payload with empty headers.
    ///
    /// The `alg` parameter is filled in from the signer when
    /// [`sign_with`](Self::sign_with) is called.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self::with_headers(JwsHeaders::new(), payload)
    }

    /// Creates a producer for the given protected headers and payload.
    pub fn with_headers(headers: JwsHeaders, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            payload: payload.into(),
            detached: false,
        }
    }

    /// Creates a producer whose output omits the payload segment.
    ///
    /// The full signing input (with the real payload) is still what gets
    /// signed; a verifier must be given the payload out of band, see
    /// [`JwsCompactConsumer::with_detached_payload`].
    pub fn detached(headers: JwsHeaders, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            headers,
            payload: payload.into(),
            detached: true,
        }
    }

    /// The protected header set of this producer.
    pub fn headers(&self) -> &JwsHeaders {
        &self.headers
    }

    /// Mutable access to the protected header set.
    pub fn headers_mut(&mut self) -> &mut JwsHeaders {
        &mut self.headers
    }

    /// The raw payload.
    pub fn plain_payload(&self) -> &[u8] {
        &self.payload
    }

    fn payload_segment(&self) -> Result<String, SignError> {
        if self.headers.payload_encoded() {
            return Ok(Base64UrlString::encode(&self.payload).into_inner());
        }

        // RFC 7797: `b64` only takes effect when the other party must
        // understand it, so it has to be listed as critical
        let listed = self
            .headers
            .critical()
            .is_some_and(|crit| crit.contains(&"b64"));
        if !listed {
            return Err(SignError::CriticalB64Missing);
        }

        let payload =
            String::from_utf8(self.payload.clone()).map_err(|_| SignError::UnencodedPayload)?;
        // the dot restriction only applies when the payload is transmitted
        // as the middle segment; a detached payload never is
        if payload.contains('.') && !self.detached {
            return Err(SignError::UnencodedPayload);
        }
        Ok(payload)
    }

    /// Returns the signing input, `BASE64URL(header) '.' payload segment`,
    /// without a signature attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the header set cannot be serialized or the
    /// payload cannot be represented with the configured `b64` status.
    pub fn unsigned_encoded(&self) -> Result<String, SignError> {
        let header = Base64UrlString::encode(self.headers.to_json()?);
        let payload = self.payload_segment()?;

        let mut out = header.into_inner();
        out.push('.');
        out.push_str(&payload);
        Ok(out)
    }

    /// Signs the document and returns the compact serialization.
    ///
    /// The `alg` parameter is set from the signer when absent; a conflicting
    /// value that is already present is an error, never silently overwritten.
    /// A key id advertised by the signer is filled in the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if the header set conflicts with the signer, the
    /// payload cannot be represented, or the signer fails.
    pub fn sign_with(&mut self, signer: &dyn JwsSigner) -> Result<String, SignError> {
        match self.headers.algorithm() {
            None => self.headers.set_algorithm(signer.algorithm()),
            Some(alg) if alg != signer.algorithm() => {
                return Err(SignError::AlgorithmMismatch {
                    header: alg,
                    signer: signer.algorithm(),
                });
            }
            Some(_) => {}
        }
        if let Some(kid) = signer.key_id() {
            if !self.headers.contains("kid") {
                self.headers.set_key_id(kid);
            }
        }

        let signing_input = self.unsigned_encoded()?;
        let signature = signer
            .sign(signing_input.as_bytes())
            .map_err(SignError::Signature)?;
        let signature = Base64UrlString::encode(signature);

        Ok(if self.detached {
            let header = signing_input
                .split('.')
                .next()
                .expect("signing input always contains a dot");
            format!("{header}..{signature}")
        } else {
            format!("{signing_input}.{signature}")
        })
    }
}

/// Parses and verifies a compact JWS.
///
/// The consumer keeps the segments exactly as transmitted and rebuilds the
/// signing input from them, so verification is immune to canonicalization
/// differences between the producer's and this crate's JSON serialization.
///
/// A parsed document is read-only: verification takes `&self`, has no side
/// effects, and may be repeated with different verifiers, including from
/// multiple threads.
#[derive(Debug)]
pub struct JwsCompactConsumer {
    encoded_header: Base64UrlString,
    payload_segment: Vec<u8>,
    payload: Vec<u8>,
    protected: ParsedProtected,
    signature: Vec<u8>,
}

impl JwsCompactConsumer {
    /// Parses a compact JWS with an inline payload.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the input does not consist of three
    /// segments, a segment is not valid base64url, or the header is not a
    /// JSON object.
    pub fn new(token: &str) -> Result<Self, ParseError> {
        Self::parse(token, None)
    }

    /// Parses a compact JWS whose payload was transmitted out of band.
    ///
    /// `payload` are the raw payload bytes; the payload segment of the
    /// signing input is derived from them according to the `b64` header.
    ///
    /// # Errors
    ///
    /// Besides the structural errors of [`new`](Self::new), supplying a
    /// detached payload for a token that carries an inline payload is an
    /// error.
    pub fn with_detached_payload(token: &str, payload: &[u8]) -> Result<Self, ParseError> {
        Self::parse(token, Some(payload))
    }

    fn parse(token: &str, detached: Option<&[u8]>) -> Result<Self, ParseError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(ParseError::SegmentCount(segments.len()));
        }

        let encoded_header = Base64UrlString::from_str(segments[0])?;
        let protected = parse_protected(&encoded_header.decode())?;
        let encoded = protected.headers.payload_encoded();

        if detached.is_some() && !segments[1].is_empty() {
            return Err(ParseError::PayloadConflict);
        }

        let (payload_segment, payload) = match detached {
            Some(payload) => {
                let segment = if encoded {
                    Base64UrlString::encode(payload).into_inner().into_bytes()
                } else {
                    payload.to_vec()
                };
                (segment, payload.to_vec())
            }
            None if encoded => {
                let segment = Base64UrlString::from_str(segments[1])?;
                let payload = segment.decode();
                (segment.into_inner().into_bytes(), payload)
            }
            None => {
                let raw = segments[1].as_bytes().to_vec();
                (raw.clone(), raw)
            }
        };

        let signature = Base64UrlString::from_str(segments[2])?.decode();

        Ok(Self {
            encoded_header,
            payload_segment,
            payload,
            protected,
            signature,
        })
    }

    /// The parsed protected header set.
    pub fn jws_headers(&self) -> &JwsHeaders {
        &self.protected.headers
    }

    /// The `alg` asserted inside the signed header.
    ///
    /// Exposed so a caller can cross-check it against the algorithm an
    /// external key provider declares for the key, before handing a verifier
    /// to [`verify_signature_with`](Self::verify_signature_with).
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        self.protected.headers.algorithm()
    }

    /// The decoded payload bytes.
    pub fn decoded_payload(&self) -> &[u8] {
        &self.payload
    }

    /// The decoded signature bytes.
    pub fn decoded_signature(&self) -> &[u8] {
        &self.signature
    }

    /// Reconstructs the signing input from the original encoded segments.
    pub fn signing_input(&self) -> Vec<u8> {
        let mut input =
            Vec::with_capacity(self.encoded_header.len() + 1 + self.payload_segment.len());
        input.extend_from_slice(self.encoded_header.as_bytes());
        input.push(b'.');
        input.extend_from_slice(&self.payload_segment);
        input
    }

    /// Validates the `crit` parameter, see [`validate_critical_headers`].
    pub fn validate_critical_headers(&self) -> bool {
        validate_critical_headers(&self.protected.headers, None)
    }

    /// Verifies the signature with the given verifier.
    ///
    /// Returns `false`, never an error, on a missing or duplicated `alg`,
    /// failed critical-header validation, an algorithm that differs from the
    /// verifier's binding, or rejection of the signature bytes themselves.
    pub fn verify_signature_with(&self, verifier: &dyn JwsVerifier) -> bool {
        if !accepts_entry(
            &self.protected.headers,
            &self.protected.duplicates,
            None,
            verifier,
        ) {
            return false;
        }
        verifier.verify(&self.signing_input(), &self.signature)
    }
}
