pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use extensions::{
    BasicConstraints, KeyUsage, SubjectAltName, SubjectKeyIdentifier, ToAndFromX509Extension,
};
use params::{DistinguishedName, ExtensionParam, Validity};
use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use sha2::Sha256;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::error::{CertAideError, Result};
use crate::identity::SanEntry;
use crate::pem_utils::{self, PemKind};

/// The signature algorithm used for every certificate this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RFC 4055 requires explicit NULL parameters for the RSA PKCS#1 v1.5 family.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::asn1::Any::null()),
            },
        }
    }
}

/// Represents a signed X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

/// The fields of a certificate callers usually want to look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    /// Big-endian serial number with no sign padding.
    pub serial_number: Vec<u8>,
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub san: Vec<SanEntry>,
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
    pub key_usage: Option<KeyUsage>,
    pub subject_key_id: Option<Vec<u8>>,
}

impl CertificateDetails {
    /// Serial number as colon-separated hex, the way `openssl x509 -text` shows it.
    pub fn serial_hex(&self) -> String {
        self.serial_number
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertAideError::SigningError(e.to_string()))
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::encode_pem(PemKind::Certificate, &self.to_der()?))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    /// Parses a certificate from PEM or raw DER.
    ///
    /// Input starting with `-----BEGIN ` is treated as PEM and must hold a
    /// `CERTIFICATE` block. A damaged envelope is reported as a parse error,
    /// same as damaged DER.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if !pem_utils::is_pem(bytes) {
            return Self::from_der(bytes);
        }

        let (kind, der) = pem_utils::decode_pem(bytes).map_err(|e| match e {
            CertAideError::InvalidPem(msg) => CertAideError::CertificateParseError(msg),
            other => other,
        })?;
        if kind != PemKind::Certificate {
            return Err(CertAideError::InvalidPem(format!(
                "expected CERTIFICATE, found {kind}"
            )));
        }
        Self::from_der(&der)
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn is_self_issued(&self) -> bool {
        self.subject_name() == self.issuer_name()
    }

    pub fn validity(&self) -> Validity {
        Validity::from_x509(&self.inner.tbs_certificate.validity)
    }

    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .map(ExtensionParam::from_x509)
            .collect()
    }

    /// Decodes the first extension of type `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| ext.to_extension())
            .transpose()
    }

    /// Extracts the inspectable fields of the certificate.
    pub fn details(&self) -> Result<CertificateDetails> {
        let tbs = &self.inner.tbs_certificate;
        let validity = self.validity();
        let basic_constraints = self.extension::<BasicConstraints>()?.unwrap_or_default();

        Ok(CertificateDetails {
            serial_number: strip_sign_padding(tbs.serial_number.as_bytes()).to_vec(),
            subject: DistinguishedName::from_x509_name(&tbs.subject),
            issuer: DistinguishedName::from_x509_name(&tbs.issuer),
            not_before: validity.not_before,
            not_after: validity.not_after,
            san: self
                .extension::<SubjectAltName>()?
                .map(|san| san.names)
                .unwrap_or_default(),
            is_ca: basic_constraints.is_ca,
            max_path_length: basic_constraints.max_path_length,
            key_usage: self.extension::<KeyUsage>()?,
            subject_key_id: self.extension::<SubjectKeyIdentifier>()?.map(|ski| ski.0),
        })
    }

    /// The subject's RSA public key.
    pub fn public_key(&self) -> Result<RsaPublicKey> {
        let spki = self
            .inner
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| CertAideError::KeyEncodingError(e.to_string()))?;
        Ok(RsaPublicKey::from_public_key_der(&spki)?)
    }

    /// Checks that this certificate was signed by `issuer`'s key and names it as issuer.
    ///
    /// Only the signature and the issuer name are checked; validity periods and
    /// constraints are not.
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<()> {
        if self.issuer_name() != issuer.subject_name() {
            return Err(CertAideError::VerificationError(format!(
                "issuer {} does not match {}",
                self.issuer_name(),
                issuer.subject_name()
            )));
        }
        if self.inner.signature_algorithm.oid != const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION
        {
            return Err(CertAideError::VerificationError(format!(
                "unsupported signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }

        let tbs = self
            .inner
            .tbs_certificate
            .to_der()
            .map_err(|e| CertAideError::VerificationError(e.to_string()))?;
        let signature = Signature::try_from(self.inner.signature.raw_bytes())
            .map_err(|e| CertAideError::VerificationError(e.to_string()))?;

        VerifyingKey::<Sha256>::new(issuer.public_key()?)
            .verify(&tbs, &signature)
            .map_err(|e| CertAideError::VerificationError(e.to_string()))
    }
}

/// Drops the leading zero DER adds to keep a positive INTEGER positive.
fn strip_sign_padding(bytes: &[u8]) -> &[u8] {
    match bytes {
        [0, rest @ ..] if !rest.is_empty() => rest,
        _ => bytes,
    }
}
