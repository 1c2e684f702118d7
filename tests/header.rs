mod common;

use jws::{
    jwa::{Hmac, SignatureAlgorithm},
    jws::validate_critical_headers,
    Base64UrlString, JwsHeaders, Uri,
};
use serde_json::json;

use common::*;

#[test]
fn typed_accessors() {
    let mut headers = JwsHeaders::new();

    headers.set_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs512));
    assert_eq!(
        headers.algorithm(),
        Some(SignatureAlgorithm::Hmac(Hmac::Hs512))
    );

    headers.set_key_id("2010-12-29");
    assert_eq!(headers.key_id(), Some("2010-12-29"));

    headers.set_typ("JWT");
    assert_eq!(headers.typ(), Some("JWT"));

    headers.set_critical(["exp"]);
    assert_eq!(headers.critical(), Some(vec!["exp"]));

    headers.set_json_web_key(json!({"kty":"oct","key_ops":["sign","verify"]}));
    assert_eq!(
        headers.json_web_key().and_then(|jwk| jwk.get("kty")),
        Some(&json!("oct"))
    );

    let jku = Uri::parse("https://example.com/keys.jwks".into()).unwrap();
    headers.set_jwk_set_url(&jku);
    assert_eq!(headers.jwk_set_url(), Some(jku));

    let x5u = Uri::parse("https://example.com/cert.pem".into()).unwrap();
    headers.set_x509_url(&x5u);
    assert_eq!(headers.x509_url(), Some(x5u));

    headers.set_x509_chain(["MIIE3jCC..."]);
    assert_eq!(headers.x509_chain(), Some(vec!["MIIE3jCC..."]));

    headers.set_x509_thumbprint("dGh1bWI");
    assert_eq!(headers.x509_thumbprint(), Some("dGh1bWI"));

    headers.set_x509_thumbprint_sha256("dGh1bWIyNTY");
    assert_eq!(headers.x509_thumbprint_sha256(), Some("dGh1bWIyNTY"));

    assert_eq!(headers.len(), 9);
    assert!(headers.contains("x5t#S256"));

    headers.remove("x5t#S256");
    assert!(!headers.contains("x5t#S256"));
    assert_eq!(headers.len(), 8);
}

#[test]
fn cookbook_protected_header_bytes() {
    // the serialized header matches the RFC 7520 section 4.4 fixture byte
    // for byte, so insertion order is what ends up on the wire
    let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    headers.set_key_id(COOKBOOK_MAC_KID);

    let encoded = Base64UrlString::encode(headers.to_json().unwrap());
    assert_eq!(&*encoded, COOKBOOK_PROTECTED);
}

#[test]
fn extension_values_roundtrip() {
    let mut headers = JwsHeaders::new();
    headers.set("http://example.com/ext", json!({"nested": [1, 2, 3]}));
    headers.set("answer", 42);

    assert_eq!(
        headers.get("http://example.com/ext"),
        Some(&json!({"nested": [1, 2, 3]}))
    );
    assert_eq!(headers.get("answer"), Some(&json!(42)));
    assert_eq!(
        headers.names().collect::<Vec<_>>(),
        ["http://example.com/ext", "answer"]
    );
}

#[test]
fn critical_header_validation() {
    // valid: all named headers present, no duplicates
    let mut protected = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    protected.set("exp", 1300819380);
    protected.set_critical(["exp"]);
    assert!(validate_critical_headers(&protected, None));

    // a name satisfied only by the unprotected set
    let mut protected = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    protected.set_critical(["exp"]);
    let mut unprotected = JwsHeaders::new();
    unprotected.set("exp", 1300819380);
    assert!(!validate_critical_headers(&protected, None));
    assert!(validate_critical_headers(&protected, Some(&unprotected)));

    // duplicates in the list are rejected even when the header exists
    let mut protected = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    protected.set("exp", 1300819380);
    protected.set_critical(["exp", "exp"]);
    assert!(!validate_critical_headers(&protected, None));

    // non-string entries are rejected
    let mut protected = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
    protected.set("crit", vec![serde_json::Value::from(1)]);
    assert!(!validate_critical_headers(&protected, None));
}

#[test]
fn unknown_algorithms_pass_through_but_do_not_verify() {
    let header = Base64UrlString::encode(br#"{"alg":"XS512"}"#);
    let token = format!("{header}.YWJj.c2ln");

    let consumer = jws::JwsCompactConsumer::new(&token).unwrap();
    assert_eq!(
        consumer.algorithm(),
        Some(SignatureAlgorithm::Other("XS512".into()))
    );
    // no registered verifier is bound to it
    assert!(!consumer.verify_signature_with(&a1_verifier()));
}
