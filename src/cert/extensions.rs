use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

use super::params::signing_error;
use crate::error::{CertAideError, Result};
use crate::identity::SanEntry;

/// Trait for converting to and from X.509 extensions.
///
/// Encoding failures surface as [`CertAideError::SigningError`] since they only
/// happen while a template is being turned into a certificate; decoding failures
/// surface as [`CertAideError::CertificateParseError`].
///
/// # Example
/// ```
/// use certaide::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
/// use certaide::identity::SanEntry;
/// let san = SubjectAltName { names: vec![SanEntry::Dns("example.com".to_string())] };
/// let encoded = san.to_x509_extension_value().unwrap();
/// let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(san.names, decoded.names);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// # Fields
/// * `names` - Classified identities, in the order they were supplied.
#[derive(Debug, Clone, Default)]
pub struct SubjectAltName {
    pub names: Vec<SanEntry>,
}

fn to_general_name(entry: &SanEntry) -> Result<GeneralName> {
    let ia5 = |s: &str| Ia5String::new(s).map_err(signing_error);
    Ok(match entry {
        SanEntry::Ip(IpAddr::V4(ip)) => {
            GeneralName::IpAddress(OctetString::new(ip.octets().to_vec()).map_err(signing_error)?)
        }
        // `::ffff:a.b.c.d` is written in its 4-byte form.
        SanEntry::Ip(IpAddr::V6(ip)) => {
            let octets = match ip.to_ipv4_mapped() {
                Some(v4) => v4.octets().to_vec(),
                None => ip.octets().to_vec(),
            };
            GeneralName::IpAddress(OctetString::new(octets).map_err(signing_error)?)
        }
        SanEntry::Email(email) => GeneralName::Rfc822Name(ia5(email)?),
        SanEntry::Uri(uri) => GeneralName::UniformResourceIdentifier(ia5(uri)?),
        SanEntry::Dns(name) => GeneralName::DnsName(ia5(name)?),
    })
}

fn from_general_name(name: &GeneralName) -> Result<SanEntry> {
    match name {
        GeneralName::IpAddress(octets) => {
            let ip = match octets.as_bytes().len() {
                4 => <[u8; 4]>::try_from(octets.as_bytes()).map(IpAddr::from).ok(),
                16 => <[u8; 16]>::try_from(octets.as_bytes()).map(IpAddr::from).ok(),
                _ => None,
            };
            ip.map(SanEntry::Ip).ok_or_else(|| {
                CertAideError::CertificateParseError(format!(
                    "IP address SAN has {} bytes",
                    octets.as_bytes().len()
                ))
            })
        }
        GeneralName::Rfc822Name(email) => Ok(SanEntry::Email(email.to_string())),
        GeneralName::UniformResourceIdentifier(uri) => Ok(SanEntry::Uri(uri.to_string())),
        GeneralName::DnsName(dns) => Ok(SanEntry::Dns(dns.to_string())),
        _ => Err(CertAideError::CertificateParseError(
            "Unsupported general name type".to_string(),
        )),
    }
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let san = x509_cert::ext::pkix::SubjectAltName(
            self.names
                .iter()
                .map(to_general_name)
                .collect::<Result<Vec<_>>>()?,
        );

        san.to_der().map_err(signing_error)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)?;
        let names = san
            .0
            .iter()
            .map(from_general_name)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { names })
    }
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };

        bc.to_der().map_err(signing_error)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

/// Represents the Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        X509KeyUsage::from(self.0).to_der().map_err(signing_error)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ku = X509KeyUsage::from_der(extension)?;
        Ok(Self(ku.0))
    }
}

/// Represents the Extended Key Usage extension.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeyUsage {
    pub usage: Vec<ExtendedKeyUsageOption>,
}

impl ToAndFromX509Extension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::ExtendedKeyUsage::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let oids: Vec<ObjectIdentifier> = self.usage.iter().map(|v| (*v).into()).collect();
        x509_cert::ext::pkix::ExtendedKeyUsage(oids)
            .to_der()
            .map_err(signing_error)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(extension)?;
        let usage = eku
            .0
            .iter()
            .map(|v| match *v {
                const_oid::db::rfc5912::ID_KP_SERVER_AUTH => Ok(ExtendedKeyUsageOption::ServerAuth),
                const_oid::db::rfc5912::ID_KP_CLIENT_AUTH => Ok(ExtendedKeyUsageOption::ClientAuth),
                const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION => {
                    Ok(ExtendedKeyUsageOption::EmailProtection)
                }
                _ => Err(CertAideError::CertificateParseError(
                    "Unsupported extended key usage option".to_string(),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { usage })
    }
}

/// Represents an option for the Extended Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyUsageOption {
    ServerAuth,
    ClientAuth,
    EmailProtection,
}

impl From<ExtendedKeyUsageOption> for ObjectIdentifier {
    fn from(value: ExtendedKeyUsageOption) -> Self {
        match value {
            ExtendedKeyUsageOption::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
            ExtendedKeyUsageOption::EmailProtection => {
                const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION
            }
        }
    }
}

/// Represents the Subject Key Identifier (SKI) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let id = OctetString::new(self.0.clone()).map_err(signing_error)?;
        x509_cert::ext::pkix::SubjectKeyIdentifier(id)
            .to_der()
            .map_err(signing_error)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self(ski.0.as_bytes().to_vec()))
    }
}

/// Represents the Authority Key Identifier (AKI) extension.
///
/// Only the `keyIdentifier` form is produced; the issuer name and serial forms
/// are ignored when reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(
                OctetString::new(self.key_identifier.as_slice()).map_err(signing_error)?,
            ),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };

        aki.to_der().map_err(signing_error)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: aki
                .key_identifier
                .map(|id| id.as_bytes().to_vec())
                .unwrap_or_default(),
        })
    }
}
