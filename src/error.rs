//! use certaide::error::CertAideError;

use std::path::PathBuf;

use thiserror::Error;

/// Represents errors that can occur while bootstrapping a root or issuing leaves.
///
/// Every failure is handed back to the immediate caller; nothing here is retried.
#[derive(Debug, Error)]
pub enum CertAideError {
    /// The entropy source or the RSA prime search failed. Fatal.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// A leaf was requested without any host identity.
    #[error("At least one host identity is required")]
    EmptyHostList,

    /// A key could not be serialized to, or read from, its canonical encoding.
    #[error("Key encoding error: {0}")]
    KeyEncodingError(String),

    /// Certificate bytes are not a well-formed X.509 certificate.
    #[error("Failed to parse certificate: {0}")]
    CertificateParseError(String),

    /// PEM envelope is malformed or carries an unexpected block type.
    #[error("Invalid PEM data: {0}")]
    InvalidPem(String),

    /// The template could not be encoded or signed.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// A signature did not verify against the claimed issuer.
    #[error("Signature verification failed: {0}")]
    VerificationError(String),

    /// File access at the I/O boundary failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CertAideError>;

impl From<der::Error> for CertAideError {
    /// Converts a `der::Error` raised while decoding into a `CertAideError`.
    fn from(err: der::Error) -> Self {
        CertAideError::CertificateParseError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertAideError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertAideError::KeyEncodingError(err.to_string())
    }
}

impl From<pkcs8::Error> for CertAideError {
    fn from(err: pkcs8::Error) -> Self {
        CertAideError::KeyEncodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CertAideError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CertAideError::KeyEncodingError(err.to_string())
    }
}
