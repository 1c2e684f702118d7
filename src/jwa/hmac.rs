/// HMAC with SHA-2 Functions as defined in [section 3.2 of RFC 7518]
///
/// [section 3.2 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.2>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hmac {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
}

impl Hmac {
    /// The minimum key size in bytes for this variant.
    ///
    /// [Section 3.2 of RFC 7518] requires a key of at least the size of the
    /// hash output.
    ///
    /// [Section 3.2 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.2>
    pub const fn minimum_key_size(self) -> usize {
        match self {
            Hmac::Hs256 => 32,
            Hmac::Hs384 => 48,
            Hmac::Hs512 => 64,
        }
    }
}
