use der::Encode;
use rsa::RsaPublicKey;
use tracing::debug;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::cert::Certificate;
use crate::cert::extensions::SubjectKeyIdentifier;
use crate::cert::params::signing_error;
use crate::key::{self, KeyPair};
use crate::tbs_certificate::TbsCertificate;
use crate::template::CertificateTemplate;

use crate::error::Result;

/// Represents an entity capable of signing certificates.
pub trait Issuer {
    /// The name written into the issued certificate's issuer field.
    fn issuer_name(&self) -> Result<Name>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Key identifier for the issued certificate's AKI, or `None` to omit it.
    fn authority_key_id(&self) -> Result<Option<Vec<u8>>>;

    /// Certifies `subject_key` with the fields of `template`. Only the public
    /// half of the subject is needed.
    fn issue(&self, template: &CertificateTemplate, subject_key: &RsaPublicKey) -> Result<Certificate> {
        let tbs = TbsCertificate::from_template(
            template,
            self.issuer_name()?,
            key::public_key_info(subject_key)?,
            self.authority_key_id()?,
        )?;
        let tbs_inner = tbs.to_tbs_certificate_inner()?;
        let tbs_der = tbs_inner.to_der().map_err(signing_error)?;
        let signature = self.signing_key().sign_data(&tbs_der)?;

        debug!(
            serial = template.serial_number.as_u128(),
            subject = %tbs.subject,
            issuer = %tbs.issuer,
            "signed certificate"
        );

        Ok(Certificate {
            inner: CertificateInner {
                tbs_certificate: tbs_inner,
                signature_algorithm: tbs.signature_algorithm.into(),
                signature: der::asn1::BitString::from_bytes(&signature).map_err(signing_error)?,
            },
        })
    }
}

/// Issuer for a self-signed certificate: issuer name is the template's own subject.
pub struct SelfIssuer<'a> {
    pub template: &'a CertificateTemplate,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<Name> {
        self.template.subject.as_x509_name()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn authority_key_id(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Issuer backed by an existing certificate and its private key.
pub struct CertificateIssuer<'a> {
    pub certificate: &'a Certificate,
    pub key: &'a KeyPair,
}

impl Issuer for CertificateIssuer<'_> {
    fn issuer_name(&self) -> Result<Name> {
        Ok(self.certificate.subject_name().clone())
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    /// The signer's own SKI when it has one, otherwise the key id derived from its key.
    fn authority_key_id(&self) -> Result<Option<Vec<u8>>> {
        if let Some(ski) = self.certificate.extension::<SubjectKeyIdentifier>()? {
            return Ok(Some(ski.0));
        }
        Ok(Some(self.key.key_id()?.to_vec()))
    }
}

/// Signs `template` for the public key `subject_key`.
///
/// With no `signer_certificate` the result is self-signed by `signer_key`,
/// otherwise it is issued under `signer_certificate`'s subject.
pub fn sign(
    template: &CertificateTemplate,
    subject_key: &RsaPublicKey,
    signer_certificate: Option<&Certificate>,
    signer_key: &KeyPair,
) -> Result<Certificate> {
    match signer_certificate {
        Some(certificate) => CertificateIssuer {
            certificate,
            key: signer_key,
        }
        .issue(template, subject_key),
        None => SelfIssuer {
            template,
            key: signer_key,
        }
        .issue(template, subject_key),
    }
}
