//! A JSON Web Signature (JWS) engine as defined in [RFC 7515].
//!
//! The crate covers both serializations of a JWS, the compact form and the
//! (flattened or general) JSON form, including multi-signature documents,
//! detached payloads, the unencoded payload option of [RFC 7797], and the
//! fail-closed verification policy that defends against algorithm-confusion
//! and duplicate-header attacks.
//!
//! Producing and consuming are symmetric: [`JwsCompactProducer`] /
//! [`JwsCompactConsumer`] handle the compact form, [`JwsJsonProducer`] /
//! [`JwsJsonConsumer`] the JSON forms. Both plug into the same
//! [`JwsSigner`] and [`JwsVerifier`] capabilities, with implementations for
//! the registered algorithm families in [`crypto`].
//!
//! [RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515>
//! [RFC 7797]: <https://datatracker.ietf.org/doc/html/rfc7797>
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    explicit_outlives_requirements,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc
)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    macro_use_extern_crate,
    non_ascii_idents,
    elided_lifetimes_in_paths
)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

pub(crate) mod base64_url;
mod macros;
mod uri;

pub mod crypto;
pub mod header;
pub mod jwa;
pub mod jwk;
pub mod jws;

pub use base64_url::{Base64UrlString, NoBase64UrlString};
pub use header::JwsHeaders;
pub use jws::{
    compact::{JwsCompactConsumer, JwsCompactProducer},
    json::{JwsJsonConsumer, JwsJsonProducer, JwsJsonSignatureEntry},
    JwsSigner, JwsVerifier,
};
pub use uri::{NoUriString, Uri};
