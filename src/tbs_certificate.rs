use der::Encode;
use der::asn1::OctetString;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, ExtendedKeyUsage, SubjectKeyIdentifier,
};
use crate::cert::params::{ExtensionParam, Validity, signing_error};
use crate::error::Result;
use crate::template::CertificateTemplate;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
/// This struct contains all the fields required to generate a valid X.509 certificate.
///
/// # Fields
/// * `serial_number` - Minimal DER INTEGER bytes of the serial.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The issuer name, copied verbatim from the signer's subject.
/// * `validity` - The certificate's validity period.
/// * `subject` - The subject name.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - X.509 extensions in encoding order.
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key: SubjectPublicKeyInfoOwned,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Lowers a template into a TBS structure under `issuer`.
    ///
    /// `authority_key_id` is the signer's key identifier; pass `None` for a
    /// self-signed certificate, which carries no AKI.
    pub fn from_template(
        template: &CertificateTemplate,
        issuer: Name,
        subject_public_key: SubjectPublicKeyInfoOwned,
        authority_key_id: Option<Vec<u8>>,
    ) -> Result<Self> {
        let mut extensions = vec![
            ExtensionParam::from_extension(&template.key_usage, true)?,
        ];
        if !template.extended_key_usage.is_empty() {
            let eku = ExtendedKeyUsage {
                usage: template.extended_key_usage.clone(),
            };
            extensions.push(ExtensionParam::from_extension(&eku, false)?);
        }
        extensions.push(ExtensionParam::from_extension(
            &template.basic_constraints,
            true,
        )?);
        extensions.push(ExtensionParam::from_extension(
            &SubjectKeyIdentifier(template.subject_key_id.clone()),
            false,
        )?);
        if let Some(key_identifier) = authority_key_id {
            extensions.push(ExtensionParam::from_extension(
                &AuthorityKeyIdentifier { key_identifier },
                false,
            )?);
        }
        if !template.subject_alt_name.names.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                &template.subject_alt_name,
                false,
            )?);
        }

        Ok(Self {
            serial_number: template.serial_number.to_der_integer_bytes(),
            signature_algorithm: SignatureAlgorithm::Sha256WithRSA,
            issuer,
            validity: template.validity.clone(),
            subject: template.subject.as_x509_name()?,
            subject_public_key,
            extensions,
        })
    }

    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone()).map_err(signing_error)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial_number).map_err(signing_error)?,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            validity: self.validity.to_x509()?,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }

    /// Encodes the `TbsCertificate` into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.to_tbs_certificate_inner()?
            .to_der()
            .map_err(signing_error)
    }
}
