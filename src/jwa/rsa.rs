/// Different RSA based algorithms for signing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsaSigning {
    /// RSASSA-PKCS1-v1_5 as defined in [section 3.3 of RFC 7518]
    ///
    /// [section 3.3 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.3>
    Pkcs1V1_5(RsassaPkcs1V1_5),
    /// RSASSA-PSS as defined in [section 3.5 of RFC 7518]
    ///
    /// [section 3.5 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.5>
    Pss(RsassaPss),
}

/// RSASSA-PKCS1-v1_5 using SHA-2 Functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsassaPkcs1V1_5 {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
}

/// RSASSA-PSS using SHA-2 Functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsassaPss {
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    Ps256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    Ps384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    Ps512,
}
