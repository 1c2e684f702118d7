//! The flattened and general JSON serializations as defined in [section 7.2
//! of RFC 7515].
//!
//! One payload is covered by one or more signature entries, each carrying its
//! own protected (and optionally unprotected) header set:
//!
//! ```json
//! {"payload":"<b64url>","signatures":[{"protected":"<b64url>","header":{},"signature":"<b64url>"}]}
//! ```
//!
//! The flattened form hoists the members of a single entry to the top level.
//!
//! [section 7.2 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-7.2>

use alloc::{string::String, vec::Vec};
use core::str::FromStr;

use serde::Serialize;
use serde_json::Value;

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

/// One signature over the shared payload of a JSON-serialized JWS.
///
/// Entries are immutable once constructed. An entry produced by a
/// [`JwsJsonProducer`] keeps the protected segment exactly as it was signed;
/// an entry parsed by a [`JwsJsonConsumer`] keeps it exactly as transmitted,
/// so verification never re-serializes a header set.
#[derive(Debug, Clone)]
pub struct JwsJsonSignatureEntry {
    payload_segment: String,
    /// The document-level `b64` status the payload segment was built with.
    payload_encoded: bool,
    encoded_protected: Option<Base64UrlString>,
    protected: ParsedProtected,
    unprotected: Option<JwsHeaders>,
    encoded_signature: Base64UrlString,
    signature: Vec<u8>,
}

impl JwsJsonSignatureEntry {
    /// The protected header set of this entry.
    ///
    /// Empty if the entry carries no `protected` member.
    pub fn protected_header(&self) -> &JwsHeaders {
        &self.protected.headers
    }

    /// The unprotected header set of this entry, if any.
    pub fn unprotected_header(&self) -> Option<&JwsHeaders> {
        self.unprotected.as_ref()
    }

    /// Looks up a header by name across both sets.
    ///
    /// The protected set is consulted first, so even for documents whose
    /// header sets overlap (which verification rejects), an unprotected
    /// value can never shadow a protected one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.protected
            .headers
            .get(name)
            .or_else(|| self.unprotected.as_ref()?.get(name))
    }

    /// The `alg` asserted inside the protected header, if any.
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        self.protected.headers.algorithm()
    }

    /// The key id of this entry, from either header set.
    pub fn key_id(&self) -> Option<&str> {
        self.get("kid")?.as_str()
    }

    /// The protected segment exactly as transmitted, if any.
    pub fn encoded_protected(&self) -> Option<&Base64UrlString> {
        self.encoded_protected.as_ref()
    }

    /// The decoded signature bytes.
    pub fn decoded_signature(&self) -> &[u8] {
        &self.signature
    }

    /// Reconstructs the signing input of this entry from the retained
    /// protected segment and the shared payload segment.
    pub fn signing_input(&self) -> Vec<u8> {
        let protected = self.encoded_protected.as_deref().unwrap_or("");
        let mut input = Vec::with_capacity(protected.len() + 1 + self.payload_segment.len());
        input.extend_from_slice(protected.as_bytes());
        input.push(b'.');
        input.extend_from_slice(self.payload_segment.as_bytes());
        input
    }

    /// Validates the `crit` parameter of this entry, see
    /// [`validate_critical_headers`].
    pub fn validate_critical_headers(&self) -> bool {
        validate_critical_headers(&self.protected.headers, self.unprotected.as_ref())
    }

    /// Verifies this entry's signature with the given verifier.
    ///
    /// Returns `false`, never an error, on any policy violation (missing,
    /// duplicated or unprotected `alg`, overlapping header sets, failed
    /// critical-header validation, a `b64` status differing from the one the
    /// payload was parsed with, an algorithm differing from the verifier's
    /// binding) as well as on rejection of the signature bytes.
    pub fn verify_signature_with(&self, verifier: &dyn JwsVerifier) -> bool {
        if self.protected.headers.payload_encoded() != self.payload_encoded {
            return false;
        }
        if !accepts_entry(
            &self.protected.headers,
            &self.protected.duplicates,
            self.unprotected.as_ref(),
            verifier,
        ) {
            return false;
        }
        verifier.verify(&self.signing_input(), &self.signature)
    }

    /// Serializes this entry as it appears inside a `signatures` array.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&EntryRepr::from(self))
    }
}

#[derive(Serialize)]
struct EntryRepr<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    protected: Option<&'a Base64UrlString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a JwsHeaders>,
    signature: &'a Base64UrlString,
}

impl<'a> From<&'a JwsJsonSignatureEntry> for EntryRepr<'a> {
    fn from(entry: &'a JwsJsonSignatureEntry) -> Self {
        Self {
            protected: entry.encoded_protected.as_ref(),
            header: entry.unprotected.as_ref(),
            signature: &entry.encoded_signature,
        }
    }
}

#[derive(Serialize)]
struct GeneralRepr<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a str>,
    signatures: Vec<EntryRepr<'a>>,
}

#[derive(Serialize)]
struct FlattenedRepr<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protected: Option<&'a Base64UrlString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a JwsHeaders>,
    signature: &'a Base64UrlString,
}

/// Produces a JSON-serialized JWS: one payload, any number of signatures.
///
/// Each [`sign_with`](Self::sign_with) call signs the shared payload with
/// its own header sets, so distinct entries may use different algorithms and
/// keys. The general form is emitted by default; a producer created with
/// [`flattened`](Self::flattened) emits the flattened form while it holds
/// exactly one signature.
#[derive(Debug)]
pub struct JwsJsonProducer {
    payload: Vec<u8>,
    flattened: bool,
    payload_encoded: Option<bool>,
    entries: Vec<JwsJsonSignatureEntry>,
}

impl JwsJsonProducer {
    /// Creates a producer emitting the general serialization.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            flattened: false,
            payload_encoded: None,
            entries: Vec::new(),
        }
    }

    /// Creates a producer that emits the flattened serialization while it
    /// holds exactly one signature, and the general form otherwise.
    pub fn flattened(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            flattened: true,
            ..Self::new(payload)
        }
    }

    /// The raw payload.
    pub fn plain_payload(&self) -> &[u8] {
        &self.payload
    }

    /// The signature entries accumulated so far.
    pub fn signature_entries(&self) -> &[JwsJsonSignatureEntry] {
        &self.entries
    }

    /// Signs the payload and appends a signature entry, returning the
    /// document serialized so far.
    ///
    /// The `alg` parameter of the protected set is filled in from the signer
    /// when absent (as is a key id the signer advertises, when neither set
    /// carries one); a conflicting `alg` is an error. The unprotected set
    /// must be disjoint from the protected set and must not carry `alg`,
    /// `crit` or `b64`, which drive the trust decision and have to be
    /// covered by the signature.
    ///
    /// # Errors
    ///
    /// Returns an error on any of the policy violations above, when entries
    /// disagree on the `b64` status, or when the signer fails.
    pub fn sign_with(
        &mut self,
        signer: &dyn JwsSigner,
        protected: JwsHeaders,
        unprotected: Option<JwsHeaders>,
    ) -> Result<String, SignError> {
        let mut protected = protected;

        match protected.algorithm() {
            None => protected.set_algorithm(signer.algorithm()),
            Some(alg) if alg != signer.algorithm() => {
                return Err(SignError::AlgorithmMismatch {
                    header: alg,
                    signer: signer.algorithm(),
                });
            }
            Some(_) => {}
        }
        if let Some(kid) = signer.key_id() {
            let present = protected.contains("kid")
                || unprotected.as_ref().is_some_and(|u| u.contains("kid"));
            if !present {
                protected.set_key_id(kid);
            }
        }

        if let Some(unprotected) = &unprotected {
            for name in ["alg", "crit", "b64"] {
                if unprotected.contains(name) {
                    return Err(SignError::MustBeProtected(name));
                }
            }
            if unprotected.names().any(|name| protected.contains(name)) {
                return Err(SignError::NotDisjoint);
            }
        }

        let encoded = protected.payload_encoded();
        if !encoded {
            let listed = protected
                .critical()
                .is_some_and(|crit| crit.contains(&"b64"));
            if !listed {
                return Err(SignError::CriticalB64Missing);
            }
        }
        if self.payload_encoded.is_some_and(|prev| prev != encoded) {
            return Err(SignError::InconsistentPayloadEncoding);
        }

        let payload_segment = if encoded {
            Base64UrlString::encode(&self.payload).into_inner()
        } else {
            String::from_utf8(self.payload.clone()).map_err(|_| SignError::UnencodedPayload)?
        };

        let encoded_protected = Base64UrlString::encode(protected.to_json()?);
        let mut signing_input =
            Vec::with_capacity(encoded_protected.len() + 1 + payload_segment.len());
        signing_input.extend_from_slice(encoded_protected.as_bytes());
        signing_input.push(b'.');
        signing_input.extend_from_slice(payload_segment.as_bytes());

        let signature = signer.sign(&signing_input).map_err(SignError::Signature)?;
        let encoded_signature = Base64UrlString::encode(&signature);

        self.payload_encoded = Some(encoded);
        self.entries.push(JwsJsonSignatureEntry {
            payload_segment,
            payload_encoded: encoded,
            encoded_protected: Some(encoded_protected),
            protected: ParsedProtected {
                headers: protected,
                duplicates: Vec::new(),
            },
            unprotected,
            encoded_signature,
            signature,
        });

        self.signed_document()
    }

    /// Serializes the signed document.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was signed yet or a header value cannot
    /// be serialized.
    pub fn signed_document(&self) -> Result<String, SignError> {
        self.document(false)
    }

    /// Serializes the signed document without its payload member.
    ///
    /// The verifying party must be given the payload out of band, see
    /// [`JwsJsonConsumer::with_detached_payload`].
    ///
    /// # Errors
    ///
    /// Same as [`signed_document`](Self::signed_document).
    pub fn signed_document_detached(&self) -> Result<String, SignError> {
        self.document(true)
    }

    fn document(&self, detached: bool) -> Result<String, SignError> {
        let Some(first) = self.entries.first() else {
            return Err(SignError::NoSignatures);
        };
        let payload = (!detached).then(|| first.payload_segment.as_str());

        let json = if self.flattened && self.entries.len() == 1 {
            serde_json::to_string(&FlattenedRepr {
                payload,
                protected: first.encoded_protected.as_ref(),
                header: first.unprotected.as_ref(),
                signature: &first.encoded_signature,
            })?
        } else {
            serde_json::to_string(&GeneralRepr {
                payload,
                signatures: self.entries.iter().map(EntryRepr::from).collect(),
            })?
        };
        Ok(json)
    }
}

/// Parses and verifies a JSON-serialized JWS.
///
/// The flattened and general forms are auto-detected by the presence of the
/// `signatures` member. A parsed document is read-only; verification takes
/// `&self` and may be repeated with different verifiers.
#[derive(Debug)]
pub struct JwsJsonConsumer {
    payload: Vec<u8>,
    entries: Vec<JwsJsonSignatureEntry>,
}

impl JwsJsonConsumer {
    /// Parses a JSON-serialized JWS with an inline payload.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the document is not a JSON object, has
    /// no signature entry, carries no payload, or any member is malformed.
    pub fn new(document: &str) -> Result<Self, ParseError> {
        Self::parse(document, None)
    }

    /// Parses a JSON-serialized JWS whose payload was transmitted out of
    /// band.
    ///
    /// `payload` are the raw payload bytes; the payload segment of every
    /// entry's signing input is derived from them according to the `b64`
    /// header.
    ///
    /// # Errors
    ///
    /// Besides the structural errors of [`new`](Self::new), supplying a
    /// detached payload for a document that carries a `payload` member is an
    /// error.
    pub fn with_detached_payload(document: &str, payload: &[u8]) -> Result<Self, ParseError> {
        Self::parse(document, Some(payload))
    }

    fn parse(document: &str, detached: Option<&[u8]>) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(document)?;
        let Value::Object(object) = value else {
            return Err(ParseError::NotAnObject);
        };

        let mut raw_entries = Vec::new();
        match object.get("signatures") {
            Some(Value::Array(list)) => {
                if list.is_empty() {
                    return Err(ParseError::MissingSignatures);
                }
                for entry in list {
                    let Value::Object(entry) = entry else {
                        return Err(ParseError::InvalidMember("signatures"));
                    };
                    raw_entries.push(RawEntry::from_object(entry)?);
                }
            }
            Some(_) => return Err(ParseError::InvalidMember("signatures")),
            None => raw_entries.push(RawEntry::from_object(&object)?),
        }

        let inline = match object.get("payload") {
            Some(Value::String(payload)) => Some(payload.as_str()),
            Some(_) => return Err(ParseError::InvalidMember("payload")),
            None => None,
        };

        // all entries share one payload, so its encoding status is taken
        // from the first entry; entries that disagree fail verification
        let encoded = raw_entries[0].protected.headers.payload_encoded();

        let (payload_segment, payload) = match (inline, detached) {
            (Some(_), Some(_)) => return Err(ParseError::PayloadConflict),
            (None, None) => return Err(ParseError::MissingPayload),
            (Some(segment), None) => {
                if encoded {
                    let segment = Base64UrlString::from_str(segment)?;
                    let payload = segment.decode();
                    (segment.into_inner(), payload)
                } else {
                    (String::from(segment), segment.as_bytes().to_vec())
                }
            }
            (None, Some(payload)) => {
                let segment = if encoded {
                    Base64UrlString::encode(payload).into_inner()
                } else {
                    String::from_utf8(payload.to_vec())
                        .map_err(|_| ParseError::InvalidMember("payload"))?
                };
                (segment, payload.to_vec())
            }
        };

        let entries = raw_entries
            .into_iter()
            .map(|raw| {
                let signature = raw.encoded_signature.decode();
                JwsJsonSignatureEntry {
                    payload_segment: payload_segment.clone(),
                    payload_encoded: encoded,
                    encoded_protected: raw.encoded_protected,
                    protected: raw.protected,
                    unprotected: raw.unprotected,
                    encoded_signature: raw.encoded_signature,
                    signature,
                }
            })
            .collect();

        Ok(Self { payload, entries })
    }

    /// The decoded payload bytes.
    pub fn decoded_payload(&self) -> &[u8] {
        &self.payload
    }

    /// The signature entries of this document.
    pub fn signature_entries(&self) -> &[JwsJsonSignatureEntry] {
        &self.entries
    }

    /// Verifies the document with the given verifier.
    ///
    /// Returns `true` iff **any** entry verifies, the "any valid signer is
    /// sufficient" trust model. Use
    /// [`verify_and_get_non_validated`](Self::verify_and_get_non_validated)
    /// when unverified co-signatures must not be dropped silently.
    pub fn verify_signature_with(&self, verifier: &dyn JwsVerifier) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.verify_signature_with(verifier))
    }

    /// Applies each verifier to its matching entries and returns the entries
    /// that did **not** verify against any of them.
    ///
    /// A verifier and an entry are matched by key id when both declare one,
    /// and by trial verification otherwise. Multi-signature documents
    /// commonly mix signers whose keys are not all known to every verifying
    /// party; this lets a caller assert "these signatures I checked, those
    /// remain" instead of silently ignoring the remainder.
    pub fn verify_and_get_non_validated(
        &self,
        verifiers: &[&dyn JwsVerifier],
    ) -> Vec<&JwsJsonSignatureEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                !verifiers.iter().any(|verifier| {
                    if let (Some(have), Some(want)) = (entry.key_id(), verifier.key_id()) {
                        if have != want {
                            return false;
                        }
                    }
                    entry.verify_signature_with(*verifier)
                })
            })
            .collect()
    }
}

struct RawEntry {
    encoded_protected: Option<Base64UrlString>,
    protected: ParsedProtected,
    unprotected: Option<JwsHeaders>,
    encoded_signature: Base64UrlString,
}

impl RawEntry {
    fn from_object(object: &serde_json::Map<String, Value>) -> Result<Self, ParseError> {
        let encoded_protected = match object.get("protected") {
            Some(Value::String(encoded)) => Some(Base64UrlString::from_str(encoded)?),
            Some(_) => return Err(ParseError::InvalidMember("protected")),
            None => None,
        };

        let protected = match &encoded_protected {
            Some(encoded) => parse_protected(&encoded.decode())?,
            None => ParsedProtected::empty(),
        };

        let unprotected = match object.get("header") {
            Some(header) => Some(JwsHeaders::from_value(header)?),
            None => None,
        };

        let encoded_signature = match object.get("signature") {
            Some(Value::String(signature)) => Base64UrlString::from_str(signature)?,
            Some(_) => return Err(ParseError::InvalidMember("signature")),
            None => return Err(ParseError::MissingSignatures),
        };

        Ok(Self {
            encoded_protected,
            protected,
            unprotected,
            encoded_signature,
        })
    }
}
