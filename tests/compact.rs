mod common;

use std::str::FromStr;

use jws::{
    crypto::{EcdsaSigner, EcdsaVerifier, HmacSigner, HmacVerifier, NoneSigner, NoneVerifier},
    jwa::{EcDsa, Hmac, SignatureAlgorithm},
    jws::{ParseError, SignError},
    Base64UrlString, JwsCompactConsumer, JwsCompactProducer, JwsHeaders, JwsSigner as _,
    JwsVerifier as _,
};

use common::*;

#[test]
fn hs256_roundtrip() {
    let signer = HmacSigner::new([0x6b; 32], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();
    let verifier = HmacVerifier::new([0x6b; 32], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();

    let mut producer = JwsCompactProducer::new(&b"hello world"[..]);
    let token = producer.sign_with(&signer).unwrap();

    // the algorithm was filled in from the signer
    assert_eq!(
        producer.headers().algorithm(),
        Some(SignatureAlgorithm::Hmac(Hmac::Hs256))
    );

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert!(consumer.verify_signature_with(&verifier));
    assert_eq!(consumer.decoded_payload(), b"hello world");
}

#[test]
fn signer_key_id_is_advertised() {
    let signer = HmacSigner::new([0x6b; 32], SignatureAlgorithm::Hmac(Hmac::Hs256))
        .unwrap()
        .with_key_id("k1");

    let mut producer = JwsCompactProducer::new("data");
    let token = producer.sign_with(&signer).unwrap();

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert_eq!(consumer.jws_headers().key_id(), Some("k1"));

    // an explicitly set key id wins over the signer's
    let mut headers = JwsHeaders::new();
    headers.set_key_id("pinned");
    let mut producer = JwsCompactProducer::with_headers(headers, "data");
    producer.sign_with(&signer).unwrap();
    assert_eq!(producer.headers().key_id(), Some("pinned"));
}

#[test]
fn scenario_fixed_vector() {
    let headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    let mut producer = JwsCompactProducer::with_headers(headers, SCENARIO_PAYLOAD);
    let token = producer.sign_with(&a1_signer()).unwrap();
    assert_eq!(token, SCENARIO_COMPACT);
    assert!(token.starts_with(&producer.unsigned_encoded().unwrap()));

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert!(consumer.verify_signature_with(&a1_verifier()));
    assert_eq!(consumer.decoded_payload(), SCENARIO_PAYLOAD.as_bytes());
}

#[test]
fn rfc7515_a1_token_verifies() {
    let consumer = JwsCompactConsumer::new(A1_TOKEN).unwrap();
    assert_eq!(consumer.jws_headers().typ(), Some("JWT"));
    assert_eq!(
        consumer.algorithm(),
        Some(SignatureAlgorithm::Hmac(Hmac::Hs256))
    );
    assert!(consumer.verify_signature_with(&a1_verifier()));

    // same algorithm, different key
    let wrong = HmacVerifier::new([0x17; 32], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();
    assert!(!consumer.verify_signature_with(&wrong));
}

#[test]
fn tampered_signature_never_verifies() {
    let consumer = JwsCompactConsumer::new(SCENARIO_COMPACT).unwrap();
    let signature = consumer.decoded_signature().to_vec();
    let (header, rest) = SCENARIO_COMPACT.split_once('.').unwrap();
    let (payload, _) = rest.split_once('.').unwrap();

    for i in 0..signature.len() {
        let mut tampered = signature.clone();
        tampered[i] ^= 0x01;
        let token = format!(
            "{header}.{payload}.{}",
            Base64UrlString::encode(&tampered)
        );
        let consumer = JwsCompactConsumer::new(&token).unwrap();
        assert!(
            !consumer.verify_signature_with(&a1_verifier()),
            "flipped signature byte {i} still verified"
        );
    }

    // a tampered payload fails too
    let token = format!(
        "{header}.{}.{}",
        Base64UrlString::encode(b"{\"msg\":\"bad job!\"}"),
        Base64UrlString::encode(&signature)
    );
    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert!(!consumer.verify_signature_with(&a1_verifier()));
}

#[test]
fn detached_unencoded_payload() {
    let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    headers.set_payload_encoded(false);

    let mut producer = JwsCompactProducer::detached(headers, PLAIN_DOCUMENT);
    let token = producer.sign_with(&a1_signer()).unwrap();
    assert_eq!(token, DETACHED_UNENCODED_TOKEN);

    let consumer =
        JwsCompactConsumer::with_detached_payload(&token, PLAIN_DOCUMENT.as_bytes()).unwrap();
    assert!(consumer.verify_signature_with(&a1_verifier()));

    // a different payload supplied out of band fails
    let consumer = JwsCompactConsumer::with_detached_payload(&token, b"$.03").unwrap();
    assert!(!consumer.verify_signature_with(&a1_verifier()));
}

#[test]
fn detached_encoded_payload() {
    let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    headers.set_key_id(COOKBOOK_MAC_KID);

    let mut producer = JwsCompactProducer::detached(headers, COOKBOOK_PAYLOAD);
    let token = producer.sign_with(&cookbook_signer()).unwrap();
    // RFC 7520 section 4.5
    assert_eq!(
        token,
        format!("{COOKBOOK_PROTECTED}..{COOKBOOK_SIGNATURE}")
    );

    let consumer =
        JwsCompactConsumer::with_detached_payload(&token, COOKBOOK_PAYLOAD.as_bytes()).unwrap();
    assert!(consumer.verify_signature_with(&cookbook_verifier()));
}

#[test]
fn detached_payload_conflicts_with_inline() {
    let err = JwsCompactConsumer::with_detached_payload(SCENARIO_COMPACT, b"other");
    assert!(matches!(err, Err(ParseError::PayloadConflict)));
}

#[test]
fn unencoded_inline_payload_must_not_contain_dots() {
    let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    headers.set_payload_encoded(false);

    let mut producer = JwsCompactProducer::with_headers(headers, PLAIN_DOCUMENT);
    let err = producer.sign_with(&a1_signer());
    assert!(matches!(err, Err(SignError::UnencodedPayload)));
}

#[test]
fn unencoded_payload_requires_critical_b64() {
    let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    // bypasses set_payload_encoded, so `crit` is never recorded
    headers.set("b64", false);

    let mut producer = JwsCompactProducer::with_headers(headers, "abc");
    let err = producer.sign_with(&a1_signer());
    assert!(matches!(err, Err(SignError::CriticalB64Missing)));
}

#[test]
fn missing_algorithm_fails_verification() {
    // a structurally fine token whose header carries no `alg` at all
    let header = Base64UrlString::encode(br#"{"kid":"a"}"#);
    let payload = Base64UrlString::encode(b"data");
    let input = format!("{header}.{payload}");
    let signature = a1_signer().sign(input.as_bytes()).unwrap();
    let token = format!("{input}.{}", Base64UrlString::encode(signature));

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert_eq!(consumer.algorithm(), None);
    assert!(!consumer.verify_signature_with(&a1_verifier()));
}

#[test]
fn rewriting_algorithm_to_none_fails_closed() {
    let (_, rest) = SCENARIO_COMPACT.split_once('.').unwrap();
    let (payload, encoded_signature) = rest.split_once('.').unwrap();

    // keep payload and signature, swap the header for `{"alg":"none"}`
    let none_header = Base64UrlString::encode(br#"{"alg":"none"}"#);
    let rewritten = format!("{none_header}.{payload}.{encoded_signature}");
    let consumer = JwsCompactConsumer::new(&rewritten).unwrap();

    // the HS256 verifier rejects it: header algorithm does not match
    assert!(!consumer.verify_signature_with(&a1_verifier()));
    // the unsecured verifier rejects it too: the signature is not empty
    assert!(!consumer.verify_signature_with(&NoneVerifier));

    // even with the signature stripped, only the explicit unsecured
    // verifier accepts, never the HS256 one
    let stripped = format!("{none_header}.{payload}.");
    let consumer = JwsCompactConsumer::new(&stripped).unwrap();
    assert!(!consumer.verify_signature_with(&a1_verifier()));
    assert!(consumer.verify_signature_with(&NoneVerifier));
}

#[test]
fn duplicate_algorithm_header_fails_verification() {
    // an attacker-crafted header carrying `alg` twice; the signature over
    // the exact bytes is valid, so only duplicate detection can reject it
    for dup in [
        r#"{"alg":"HS256","alg":"HS256"}"#,
        r#"{"alg":"none","alg":"HS256"}"#,
        r#"{"alg":"HS256","alg":"none"}"#,
    ] {
        let header = Base64UrlString::encode(dup.as_bytes());
        let payload = Base64UrlString::encode(b"data");
        let input = format!("{header}.{payload}");
        let signature = a1_signer().sign(input.as_bytes()).unwrap();
        let token = format!("{input}.{}", Base64UrlString::encode(signature));

        let consumer = JwsCompactConsumer::new(&token).unwrap();
        assert!(
            !consumer.verify_signature_with(&a1_verifier()),
            "duplicate alg in {dup} was not rejected"
        );
        assert!(!consumer.verify_signature_with(&NoneVerifier));
    }

    // the single-occurrence control is accepted
    let header = Base64UrlString::encode(br#"{"alg":"HS256"}"#);
    let payload = Base64UrlString::encode(b"data");
    let input = format!("{header}.{payload}");
    let signature = a1_signer().sign(input.as_bytes()).unwrap();
    let token = format!("{input}.{}", Base64UrlString::encode(signature));
    assert!(JwsCompactConsumer::new(&token)
        .unwrap()
        .verify_signature_with(&a1_verifier()));
}

#[test]
fn unsecured_roundtrip() {
    let mut producer = JwsCompactProducer::new(&b"{\"a\":\"b\"}"[..]);
    let token = producer.sign_with(&NoneSigner).unwrap();

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert_eq!(consumer.decoded_signature().len(), 0);
    assert!(consumer.verify_signature_with(&NoneVerifier));
    assert!(!consumer.verify_signature_with(&a1_verifier()));
}

#[test]
fn critical_headers_gate_verification() {
    // crit names a header that is absent
    let header = Base64UrlString::encode(br#"{"alg":"HS256","crit":["exp"]}"#);
    let payload = Base64UrlString::encode(b"data");
    let input = format!("{header}.{payload}");
    let signature = a1_signer().sign(input.as_bytes()).unwrap();
    let token = format!("{input}.{}", Base64UrlString::encode(signature));

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert!(!consumer.validate_critical_headers());
    assert!(!consumer.verify_signature_with(&a1_verifier()));

    // with the named header present, the same document verifies
    let header = Base64UrlString::encode(br#"{"alg":"HS256","crit":["exp"],"exp":1300819380}"#);
    let input = format!("{header}.{payload}");
    let signature = a1_signer().sign(input.as_bytes()).unwrap();
    let token = format!("{input}.{}", Base64UrlString::encode(signature));

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    assert!(consumer.validate_critical_headers());
    assert!(consumer.verify_signature_with(&a1_verifier()));
}

#[test]
fn producer_rejects_conflicting_algorithm() {
    let headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs384));
    let mut producer = JwsCompactProducer::with_headers(headers, "data");
    let err = producer.sign_with(&a1_signer());
    assert!(matches!(err, Err(SignError::AlgorithmMismatch { .. })));
}

#[test]
fn structural_errors() {
    assert!(matches!(
        JwsCompactConsumer::new("onlyone"),
        Err(ParseError::SegmentCount(1))
    ));
    assert!(matches!(
        JwsCompactConsumer::new("a.b"),
        Err(ParseError::SegmentCount(2))
    ));
    assert!(matches!(
        JwsCompactConsumer::new("a.b.c.d"),
        Err(ParseError::SegmentCount(4))
    ));

    // header segment that is not base64url
    assert!(JwsCompactConsumer::new("不正.YWJj.c2ln").is_err());

    // header that is valid base64url but not a JSON object
    let header = Base64UrlString::encode(b"[1,2,3]");
    assert!(matches!(
        JwsCompactConsumer::new(&format!("{header}.YWJj.c2ln")),
        Err(ParseError::Header(_))
    ));
}

#[test]
fn rs256_fixture_verifies() {
    use jws::crypto::RsaVerifier;
    use rsa::{BigUint, RsaPublicKey};

    let n = BigUint::from_bytes_be(&Base64UrlString::from_str(A2_RSA_MODULUS).unwrap().decode());
    let e = BigUint::from_bytes_be(&Base64UrlString::from_str(A2_RSA_EXPONENT).unwrap().decode());
    let key = RsaPublicKey::new(n, e).unwrap();
    let verifier = RsaVerifier::new(
        key,
        SignatureAlgorithm::from_name("RS256"),
    )
    .unwrap();

    let consumer = JwsCompactConsumer::new(A2_TOKEN).unwrap();
    assert_eq!(consumer.algorithm(), Some(SignatureAlgorithm::from_name("RS256")));
    assert!(consumer.verify_signature_with(&verifier));

    // HS256 with the "public key as MAC secret" trick must not verify: the
    // verifier's algorithm binding does not match the asserted RS256
    let confused = HmacVerifier::new(vec![0x41; 64], SignatureAlgorithm::Hmac(Hmac::Hs256)).unwrap();
    assert!(!consumer.verify_signature_with(&confused));
}

#[test]
fn rsa_roundtrip() {
    use jws::crypto::{RsaSigner, RsaVerifier};
    use rsa::RsaPrivateKey;

    let mut rng = rand_core::OsRng;
    let key = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let public = key.to_public_key();

    for alg in ["RS256", "PS384"] {
        let alg = SignatureAlgorithm::from_name(alg);
        let signer = RsaSigner::new(key.clone(), alg.clone()).unwrap();
        let verifier = RsaVerifier::new(public.clone(), alg.clone()).unwrap();

        let headers = JwsHeaders::with_algorithm(alg);
        let mut producer = JwsCompactProducer::with_headers(headers, "payload");
        let token = producer.sign_with(&signer).unwrap();

        let consumer = JwsCompactConsumer::new(&token).unwrap();
        assert!(consumer.verify_signature_with(&verifier));
    }
}

#[test]
fn ecdsa_roundtrip() {
    let mut rng = rand_core::OsRng;
    let key = p256::ecdsa::SigningKey::random(&mut rng);
    let public = *key.verifying_key();

    let signer =
        EcdsaSigner::new_p256(key, SignatureAlgorithm::EcDsa(EcDsa::Es256)).unwrap();
    let verifier =
        EcdsaVerifier::new_p256(public, SignatureAlgorithm::EcDsa(EcDsa::Es256)).unwrap();

    let mut producer = JwsCompactProducer::new("payload");
    let token = producer.sign_with(&signer).unwrap();

    let consumer = JwsCompactConsumer::new(&token).unwrap();
    // ES256 signatures are the fixed-size r || s concatenation
    assert_eq!(consumer.decoded_signature().len(), 64);
    assert!(consumer.verify_signature_with(&verifier));

    // malformed signature lengths are rejected without panicking
    assert!(!verifier.verify(b"input", &[0u8; 63]));
    assert!(!verifier.verify(b"input", &[]));
}

#[test]
fn es512_has_no_backing_capability() {
    use jws::crypto::InvalidKeyError;

    let mut rng = rand_core::OsRng;
    let key = p256::ecdsa::SigningKey::random(&mut rng);
    let err = EcdsaSigner::new_p256(key, SignatureAlgorithm::EcDsa(EcDsa::Es512));
    assert!(matches!(err, Err(InvalidKeyError::UnsupportedAlgorithm(_))));
}
