use alloc::{string::String, vec::Vec};
use core::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::Value;

use super::{HeaderError, JwsHeaders, Params};

/// A protected header set parsed from its decoded JSON text, together with
/// the names that occurred more than once at the top nesting level.
///
/// `serde_json` silently resolves duplicate object keys last-wins, which
/// would let an attacker smuggle a second `alg` value past verification.
/// Parsing through [`parse_protected`] keeps every occurrence observable so
/// the policy layer can fail closed on duplicates.
#[derive(Debug, Clone)]
pub(crate) struct ParsedProtected {
    pub(crate) headers: JwsHeaders,
    pub(crate) duplicates: Vec<String>,
}

impl ParsedProtected {
    pub(crate) fn empty() -> Self {
        Self {
            headers: JwsHeaders::new(),
            duplicates: Vec::new(),
        }
    }
}

/// Parses the raw JSON text of a protected header set.
///
/// Fails with a structural error if the text is not a JSON object.
pub(crate) fn parse_protected(raw: &[u8]) -> Result<ParsedProtected, HeaderError> {
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    let parsed = deserializer.deserialize_map(DuplicateTrackingVisitor)?;
    deserializer.end()?;
    Ok(parsed)
}

struct DuplicateTrackingVisitor;

impl<'de> Visitor<'de> for DuplicateTrackingVisitor {
    type Value = ParsedProtected;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut params = Params::default();
        let mut duplicates = Vec::new();

        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            if params.insert(name.clone(), value).is_some() && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }

        Ok(ParsedProtected {
            headers: JwsHeaders::from_params(params),
            duplicates,
        })
    }
}
