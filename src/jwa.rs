//! Signature algorithm identifiers (JWA) as defined in [RFC 7518]
//!
//! [RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518>

mod ecdsa;
mod hmac;
mod rsa;

use alloc::string::String;

use crate::macros::impl_serde_jwa;

#[doc(inline)]
pub use self::{
    ecdsa::EcDsa,
    hmac::Hmac,
    rsa::{RsaSigning, RsassaPkcs1V1_5, RsassaPss},
};

/// A JSON Web Algorithm (JWA) for signing operations (JWS) as defined in [RFC
/// 7518 section 3]
///
/// This enum covers the `alg` Header Parameter Values for JWS. It represents
/// the table from [section 3.1].
///
/// [RFC 7518 section 3]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3>
/// [section 3.1]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.1>
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SignatureAlgorithm {
    /// HMAC with SHA-2 Functions
    Hmac(Hmac),
    /// RSASSA-PKCS1-v1_5 or RSASSA-PSS using SHA-2 Functions
    Rsa(RsaSigning),
    /// Digital Signature with ECDSA
    EcDsa(EcDsa),
    /// The "none" algorithm as defined in [section 3.6 of RFC 7518].
    ///
    /// Using this algorithm essentially means that there is
    /// no integrity protection for the JWS. It only ever verifies
    /// against the explicit unsecured verifier capability.
    ///
    /// [section 3.6 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.6>
    None,
    /// JSON Web Algorithms that are not recognised by this implementation.
    ///
    /// If you want to implement custom algorithms via a custom
    /// [`JwsSigner`](crate::jws::JwsSigner) and
    /// [`JwsVerifier`](crate::jws::JwsVerifier) type, you should use this
    /// variant to define an identifier for your algorithm.
    Other(String),
}

impl_serde_jwa!(
    SignatureAlgorithm,
    [
        "HS256" => Self::Hmac(Hmac::Hs256); Self::Hmac(Hmac::Hs256),
        "HS384" => Self::Hmac(Hmac::Hs384); Self::Hmac(Hmac::Hs384),
        "HS512" => Self::Hmac(Hmac::Hs512); Self::Hmac(Hmac::Hs512),

        "RS256" => Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs256)); Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs256)),
        "RS384" => Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs384)); Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs384)),
        "RS512" => Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs512)); Self::Rsa(RsaSigning::Pkcs1V1_5(RsassaPkcs1V1_5::Rs512)),

        "PS256" => Self::Rsa(RsaSigning::Pss(RsassaPss::Ps256)); Self::Rsa(RsaSigning::Pss(RsassaPss::Ps256)),
        "PS384" => Self::Rsa(RsaSigning::Pss(RsassaPss::Ps384)); Self::Rsa(RsaSigning::Pss(RsassaPss::Ps384)),
        "PS512" => Self::Rsa(RsaSigning::Pss(RsassaPss::Ps512)); Self::Rsa(RsaSigning::Pss(RsassaPss::Ps512)),

        "ES256" => Self::EcDsa(EcDsa::Es256); Self::EcDsa(EcDsa::Es256),
        "ES384" => Self::EcDsa(EcDsa::Es384); Self::EcDsa(EcDsa::Es384),
        "ES512" => Self::EcDsa(EcDsa::Es512); Self::EcDsa(EcDsa::Es512),

        "none" => Self::None; Self::None,
    ]
);
