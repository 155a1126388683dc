use std::fmt;

use crate::error::{CertAideError, Result};

/// Marker that distinguishes PEM text from raw DER.
pub const PEM_PREFIX: &[u8] = b"-----BEGIN ";

/// The PEM block types this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemKind {
    Certificate,
    /// PKCS#8 private key. Always used on output.
    PrivateKey,
    /// PKCS#1 RSA private key. Accepted on input only.
    RsaPrivateKey,
}

impl PemKind {
    pub const fn tag(self) -> &'static str {
        match self {
            PemKind::Certificate => "CERTIFICATE",
            PemKind::PrivateKey => "PRIVATE KEY",
            PemKind::RsaPrivateKey => "RSA PRIVATE KEY",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CERTIFICATE" => Some(PemKind::Certificate),
            "PRIVATE KEY" => Some(PemKind::PrivateKey),
            "RSA PRIVATE KEY" => Some(PemKind::RsaPrivateKey),
            _ => None,
        }
    }
}

impl fmt::Display for PemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returns true when `bytes` start with a PEM `-----BEGIN ` line.
pub fn is_pem(bytes: &[u8]) -> bool {
    bytes.starts_with(PEM_PREFIX)
}

/// Convert DER-encoded data into a PEM-encoded string for `kind`.
pub fn encode_pem(kind: PemKind, der: &[u8]) -> String {
    let block = pem::Pem::new(kind.tag(), der);
    pem::encode_config(
        &block,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Parse the first PEM block in `input`, returning its kind and DER payload.
pub fn decode_pem(input: impl AsRef<[u8]>) -> Result<(PemKind, Vec<u8>)> {
    let block = pem::parse(input).map_err(|e| CertAideError::InvalidPem(e.to_string()))?;
    let kind = PemKind::from_tag(block.tag()).ok_or_else(|| {
        CertAideError::InvalidPem(format!("unexpected block type {}", block.tag()))
    })?;
    Ok((kind, block.into_contents()))
}

/// Parse a PEM block that must be of type `expected`.
pub fn decode_pem_as(input: impl AsRef<[u8]>, expected: PemKind) -> Result<Vec<u8>> {
    let (kind, der) = decode_pem(input)?;
    if kind != expected {
        return Err(CertAideError::InvalidPem(format!(
            "expected {expected}, found {kind}"
        )));
    }
    Ok(der)
}
