//! [`JwsHeaders`] and associated abstractions as defined in [section 4 of RFC
//! 7515].
//!
//! [section 4 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-4>

mod error;
pub(crate) mod parse;

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use indexmap::IndexMap;
use mediatype::MediaTypeBuf;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[doc(inline)]
pub use self::error::HeaderError;
use crate::{jwa::SignatureAlgorithm, uri::Uri};

/// The ordered name to value mapping backing a header set.
///
/// Insertion order is preserved so that serializing a header set emits its
/// parameters in the order the caller set them.
pub(crate) type Params = IndexMap<String, Value, hashbrown::DefaultHashBuilder>;

/// A JOSE header set for JWS as defined by [section 4] of RFC 7515.
///
/// A header set is an ordered mapping from parameter name to a JSON value.
/// The registered parameter names (`alg`, `kid`, `typ`, `cty`, `crit`, `b64`,
/// `jwk`, `jku`, `x5u`, `x5c`, `x5t`, `x5t#S256`) have typed convenience
/// accessors; any other name passes through as an opaque extension value.
///
/// No validation is performed when setting values. Whether a header set is
/// acceptable is decided when a document is produced or verified.
///
/// Depending on where a header set appears it is either *protected*
/// (covered by the signature, transmitted base64url-encoded) or
/// *unprotected* (transmitted in clear, JSON serialization only); the
/// producers and consumers in [`crate::jws`] keep the two apart.
///
/// [section 4]: <https://datatracker.ietf.org/doc/html/rfc7515#section-4>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JwsHeaders {
    params: Params,
}

impl JwsHeaders {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Creates a header set with the `alg` parameter already set.
    pub fn with_algorithm(alg: SignatureAlgorithm) -> Self {
        let mut headers = Self::new();
        headers.set_algorithm(alg);
        headers
    }

    pub(crate) fn from_params(params: Params) -> Self {
        Self { params }
    }

    /// Returns the value of the header with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Sets the header with the given name, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(name.into(), value.into());
    }

    /// Removes the header with the given name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        // shift_remove keeps the order of the remaining parameters stable
        self.params.shift_remove(name)
    }

    /// Whether a header with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Whether this header set has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The number of parameters in this header set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterates over the parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `alg` parameter, if present and a string.
    ///
    /// Identifiers outside the registry are returned as
    /// [`SignatureAlgorithm::Other`]; a non-string value yields [`None`].
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        self.params
            .get("alg")?
            .as_str()
            .map(SignatureAlgorithm::from_name)
    }

    /// Sets the `alg` parameter.
    pub fn set_algorithm(&mut self, alg: SignatureAlgorithm) {
        self.set("alg", alg.to_string());
    }

    /// The `kid` parameter, if present and a string.
    pub fn key_id(&self) -> Option<&str> {
        self.params.get("kid")?.as_str()
    }

    /// Sets the `kid` parameter.
    pub fn set_key_id(&mut self, kid: impl Into<String>) {
        self.set("kid", kid.into());
    }

    /// The `typ` parameter, if present and a string.
    pub fn typ(&self) -> Option<&str> {
        self.params.get("typ")?.as_str()
    }

    /// Sets the `typ` parameter.
    pub fn set_typ(&mut self, typ: impl Into<String>) {
        self.set("typ", typ.into());
    }

    /// The `cty` parameter parsed as a media type.
    ///
    /// Per [section 4.1.10 of RFC 7515], a value without a `/` is understood
    /// as having an implied `application/` prefix.
    ///
    /// [section 4.1.10 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-4.1.10>
    pub fn content_type(&self) -> Option<MediaTypeBuf> {
        let raw = self.params.get("cty")?.as_str()?;
        let full = if raw.contains('/') {
            String::from(raw)
        } else {
            alloc::format!("application/{raw}")
        };
        MediaTypeBuf::from_string(full).ok()
    }

    /// Sets the `cty` parameter.
    pub fn set_content_type(&mut self, cty: MediaTypeBuf) {
        self.set("cty", cty.to_string());
    }

    /// The `crit` parameter, if present and a list of strings.
    pub fn critical(&self) -> Option<Vec<&str>> {
        let list = self.params.get("crit")?.as_array()?;
        list.iter().map(Value::as_str).collect()
    }

    /// Sets the `crit` parameter.
    pub fn set_critical<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let list: Vec<Value> = names
            .into_iter()
            .map(|name| Value::from(name.into()))
            .collect();
        self.set("crit", list);
    }

    /// Whether the payload of this JWS is base64url-encoded.
    ///
    /// This is the `b64` parameter defined in [RFC 7797]; it defaults to
    /// `true` when absent.
    ///
    /// [RFC 7797]: <https://datatracker.ietf.org/doc/html/rfc7797>
    pub fn payload_encoded(&self) -> bool {
        self.params
            .get("b64")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Sets the `b64` parameter.
    ///
    /// [RFC 7797] requires `b64` to be listed in the `crit` header, so this
    /// also records it there when missing.
    ///
    /// [RFC 7797]: <https://datatracker.ietf.org/doc/html/rfc7797#section-6>
    pub fn set_payload_encoded(&mut self, encoded: bool) {
        self.set("b64", encoded);

        let mut crit = self
            .params
            .get("crit")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if !crit.iter().any(|v| v.as_str() == Some("b64")) {
            crit.push(Value::from("b64"));
        }
        self.set("crit", crit);
    }

    /// The `jwk` parameter as an opaque JSON value.
    ///
    /// Key material handling is the business of an external key provider,
    /// so the value is passed through unparsed.
    pub fn json_web_key(&self) -> Option<&Value> {
        self.params.get("jwk")
    }

    /// Sets the `jwk` parameter.
    pub fn set_json_web_key(&mut self, jwk: Value) {
        self.set("jwk", jwk);
    }

    /// The `jku` parameter, if present and a valid URI.
    pub fn jwk_set_url(&self) -> Option<Uri> {
        let raw = self.params.get("jku")?.as_str()?;
        Uri::parse(String::from(raw)).ok()
    }

    /// Sets the `jku` parameter.
    pub fn set_jwk_set_url(&mut self, jku: &Uri) {
        self.set("jku", jku.as_str());
    }

    /// The `x5u` parameter, if present and a valid URI.
    pub fn x509_url(&self) -> Option<Uri> {
        let raw = self.params.get("x5u")?.as_str()?;
        Uri::parse(String::from(raw)).ok()
    }

    /// Sets the `x5u` parameter.
    pub fn set_x509_url(&mut self, x5u: &Uri) {
        self.set("x5u", x5u.as_str());
    }

    /// The `x5c` parameter, if present and a list of strings.
    ///
    /// Each entry is the base64 DER encoding of one certificate.
    pub fn x509_chain(&self) -> Option<Vec<&str>> {
        let list = self.params.get("x5c")?.as_array()?;
        list.iter().map(Value::as_str).collect()
    }

    /// Sets the `x5c` parameter.
    pub fn set_x509_chain<I>(&mut self, chain: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let list: Vec<Value> = chain
            .into_iter()
            .map(|cert| Value::from(cert.into()))
            .collect();
        self.set("x5c", list);
    }

    /// The `x5t` parameter, if present and a string.
    pub fn x509_thumbprint(&self) -> Option<&str> {
        self.params.get("x5t")?.as_str()
    }

    /// Sets the `x5t` parameter.
    pub fn set_x509_thumbprint(&mut self, x5t: impl Into<String>) {
        self.set("x5t", x5t.into());
    }

    /// The `x5t#S256` parameter, if present and a string.
    pub fn x509_thumbprint_sha256(&self) -> Option<&str> {
        self.params.get("x5t#S256")?.as_str()
    }

    /// Sets the `x5t#S256` parameter.
    pub fn set_x509_thumbprint_sha256(&mut self, x5t: impl Into<String>) {
        self.set("x5t#S256", x5t.into());
    }

    /// Serializes this header set as JSON, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.params)
    }

    /// Builds a header set from an already-parsed JSON value.
    ///
    /// This is how unprotected (`header`) members of the JSON serialization
    /// are read. Duplicate names in the original text are unobservable here;
    /// protected header sets go through the duplicate-tracking text parser
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, HeaderError> {
        match value {
            Value::Object(object) => Ok(Self {
                params: object
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            }),
            _ => Err(HeaderError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::jwa::Hmac;

    #[test]
    fn serializes_in_insertion_order() {
        let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        headers.set_key_id("4290");
        assert_eq!(headers.to_json().unwrap(), r#"{"alg":"HS256","kid":"4290"}"#);

        let mut headers = JwsHeaders::new();
        headers.set_typ("JWT");
        headers.set_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        assert_eq!(headers.to_json().unwrap(), r#"{"typ":"JWT","alg":"HS256"}"#);
    }

    #[test]
    fn unencoded_payload_flag_records_crit() {
        let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        headers.set_payload_encoded(false);
        assert_eq!(
            headers.to_json().unwrap(),
            r#"{"alg":"HS256","b64":false,"crit":["b64"]}"#
        );
        assert!(!headers.payload_encoded());
    }

    #[test]
    fn extension_values_pass_through() {
        let mut headers = JwsHeaders::new();
        headers.set("http://example.com/ext", true);
        assert_eq!(headers.get("http://example.com/ext"), Some(&Value::Bool(true)));
        assert_eq!(headers.algorithm(), None);
    }

    #[test]
    fn content_type_prepends_application() {
        let mut headers = JwsHeaders::new();
        headers.set("cty", "JWT");
        assert_eq!(
            headers.content_type().unwrap().to_string().to_ascii_lowercase(),
            "application/jwt"
        );
    }

    #[test]
    fn non_string_algorithm_is_absent() {
        let mut headers = JwsHeaders::new();
        headers.set("alg", 42);
        assert_eq!(headers.algorithm(), None);
    }
}
