use alloc::string::String;
use core::{fmt, ops::Deref};

use thiserror::Error;

/// Error type indicating that a header parameter was not a valid URI
/// reference.
#[derive(Debug, Clone, Copy, Error)]
#[error("the string is not a valid URI")]
pub struct NoUriString;

/// A URI type implemented using [`fluent_uri`].
///
/// This is a thin wrapper around a [`fluent_uri::Uri<String>`] used for the
/// URI-valued header parameters (`jku`, `x5u`).
#[derive(Debug, Clone, Default)]
pub struct Uri(fluent_uri::Uri<String>);

impl Uri {
    /// Parses the given string into a URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid URI.
    pub fn parse(uri: String) -> Result<Self, NoUriString> {
        fluent_uri::Uri::parse(uri)
            .map(Self)
            .map_err(|_| NoUriString)
    }

    /// Turns this URI into the underlying [`fluent_uri::Uri<String>`].
    pub fn into_inner(self) -> fluent_uri::Uri<String> {
        self.0
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str().eq(other.0.as_str())
    }
}
impl Eq for Uri {}

impl Deref for Uri {
    type Target = fluent_uri::Uri<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<fluent_uri::Uri<String>> for Uri {
    fn from(uri: fluent_uri::Uri<String>) -> Self {
        Self(uri)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
