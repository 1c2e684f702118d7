use alloc::{collections::BTreeSet, string::String};

use super::JwsVerifier;
use crate::header::JwsHeaders;

/// Validates the `crit` parameter of a protected header set as defined in
/// [section 4.1.11 of RFC 7515].
///
/// Returns `true` when `crit` is absent, or when it is a non-empty list of
/// unique names, each of which is present as a header, in the protected set
/// or, for the JSON serialization, in the given unprotected set. A list with
/// a duplicate entry, a non-string entry, or a name no header carries fails
/// validation, and callers must treat the document as unverified regardless
/// of whether its signature bytes would check out.
///
/// [section 4.1.11 of RFC 7515]: <https://datatracker.ietf.org/doc/html/rfc7515#section-4.1.11>
pub fn validate_critical_headers(protected: &JwsHeaders, unprotected: Option<&JwsHeaders>) -> bool {
    let Some(crit) = protected.get("crit") else {
        return true;
    };
    let Some(list) = crit.as_array() else {
        return false;
    };
    if list.is_empty() {
        return false;
    }

    let mut seen = BTreeSet::new();
    for name in list {
        let Some(name) = name.as_str() else {
            return false;
        };
        if !seen.insert(name) {
            return false;
        }
        let present = protected.contains(name) || unprotected.is_some_and(|u| u.contains(name));
        if !present {
            return false;
        }
    }

    true
}

/// The policy gate every signature entry passes before any signature math.
///
/// Fails closed on: a duplicated protected header name (notably a second
/// `alg` smuggled into the protected text), overlapping protected and
/// unprotected sets, trust-relevant parameters (`alg`, `crit`, `b64`) in the
/// unprotected set, a missing or non-string `alg`, an unsatisfied `crit`
/// list, and an `alg` that differs from the verifier's binding, including a
/// document rewritten to claim `none`.
pub(crate) fn accepts_entry(
    protected: &JwsHeaders,
    duplicates: &[String],
    unprotected: Option<&JwsHeaders>,
    verifier: &dyn JwsVerifier,
) -> bool {
    if !duplicates.is_empty() {
        return false;
    }

    if let Some(unprotected) = unprotected {
        if unprotected.names().any(|name| protected.contains(name)) {
            return false;
        }
        if ["alg", "crit", "b64"]
            .iter()
            .any(|name| unprotected.contains(name))
        {
            return false;
        }
    }

    let Some(alg) = protected.algorithm() else {
        return false;
    };
    if !validate_critical_headers(protected, unprotected) {
        return false;
    }

    alg == verifier.algorithm()
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;
    use crate::jwa::{Hmac, SignatureAlgorithm};

    #[test]
    fn absent_crit_is_valid() {
        let headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        assert!(validate_critical_headers(&headers, None));
    }

    #[test]
    fn crit_naming_absent_header_fails() {
        let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        headers.set_critical(["exp"]);
        assert!(!validate_critical_headers(&headers, None));

        headers.set("exp", 1300819380);
        assert!(validate_critical_headers(&headers, None));
    }

    #[test]
    fn crit_with_duplicate_entry_fails() {
        let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        headers.set("exp", 1300819380);
        headers.set_critical(["exp", "exp"]);
        assert!(!validate_critical_headers(&headers, None));
    }

    #[test]
    fn empty_crit_fails() {
        let mut headers = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        headers.set_critical(Vec::<String>::new());
        assert!(!validate_critical_headers(&headers, None));
    }

    #[test]
    fn crit_satisfied_by_unprotected_header() {
        let mut protected = JwsHeaders::with_algorithm(SignatureAlgorithm::Hmac(Hmac::Hs256));
        protected.set_critical(["exp"]);

        let mut unprotected = JwsHeaders::new();
        unprotected.set("exp", 1300819380);

        assert!(!validate_critical_headers(&protected, None));
        assert!(validate_critical_headers(&protected, Some(&unprotected)));
    }
}
