//! The intended call-site pattern for the algorithm-confusion defense: the
//! algorithm a trusted key provider declares for a key id is cross-checked
//! against the `alg` parsed out of the signed header before a verifier is
//! even constructed.

mod common;

use std::collections::HashMap;

use jws::{
    crypto::HmacVerifier,
    jwa::{Hmac, SignatureAlgorithm},
    jwk::{KeyProvider, KeyProviderError},
    JwsCompactConsumer,
};

use common::*;

struct StaticKeySet {
    keys: HashMap<&'static str, (&'static str, SignatureAlgorithm)>,
}

impl KeyProvider for StaticKeySet {
    type Key = &'static str;

    fn key(&self, key_id: &str) -> Result<Self::Key, KeyProviderError> {
        self.keys
            .get(key_id)
            .map(|(encoded, _)| *encoded)
            .ok_or_else(|| KeyProviderError::UnknownKeyId(key_id.into()))
    }

    fn algorithm(&self, key_id: &str) -> Result<SignatureAlgorithm, KeyProviderError> {
        self.keys
            .get(key_id)
            .map(|(_, alg)| alg.clone())
            .ok_or_else(|| KeyProviderError::UnknownKeyId(key_id.into()))
    }
}

fn provider() -> StaticKeySet {
    let mut keys = HashMap::new();
    keys.insert(
        COOKBOOK_MAC_KID,
        (COOKBOOK_MAC_KEY, SignatureAlgorithm::Hmac(Hmac::Hs256)),
    );
    StaticKeySet { keys }
}

#[test]
fn resolves_and_verifies_by_key_id() {
    let mut headers = jws::JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    headers.set_key_id(COOKBOOK_MAC_KID);
    let mut producer = jws::JwsCompactProducer::with_headers(headers, COOKBOOK_PAYLOAD);
    let token = producer.sign_with(&cookbook_signer()).unwrap();

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    let provider = provider();

    let kid = consumer.jws_headers().key_id().unwrap();
    let expected = provider.algorithm(kid).unwrap();

    // the header's alg must equal what the provider declares for the key;
    // a token rewritten to assert a different algorithm stops right here
    assert_eq!(consumer.algorithm(), Some(expected.clone()));

    let verifier = HmacVerifier::from_encoded(provider.key(kid).unwrap(), expected).unwrap();
    assert!(consumer.verify_signature_with(&verifier));
}

#[test]
fn unknown_key_ids_are_loud() {
    let provider = provider();
    assert_eq!(
        provider.key("nope"),
        Err(KeyProviderError::UnknownKeyId("nope".into()))
    );
    assert_eq!(
        provider.algorithm("nope"),
        Err(KeyProviderError::UnknownKeyId("nope".into()))
    );
}
