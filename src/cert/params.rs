use bon::Builder;
use const_oid::ObjectIdentifier;
use const_oid::db::rfc4519;
use der::asn1::{Any, SetOfVec};
use der::{Tag, Tagged};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};
use x509_cert::time::Time;

use super::extensions::ToAndFromX509Extension;
use crate::error::{CertAideError, Result};

/// Distinguished name parameters for building an X.509 certificate.
///
/// Attributes are emitted in the order C, ST, L, O, OU, CN. Empty attributes are
/// left out of the encoded name.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `country` - The country (C).
/// * `state` - The state or province (ST).
/// * `locality` - The locality or city (L).
/// * `organization` - The organization (O).
/// * `organization_unit` - The organizational unit (OU).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(default)]
    pub common_name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    fn attributes(&self) -> [(ObjectIdentifier, Option<&str>); 6] {
        [
            (rfc4519::COUNTRY_NAME, self.country.as_deref()),
            (rfc4519::ST, self.state.as_deref()),
            (rfc4519::LOCALITY_NAME, self.locality.as_deref()),
            (rfc4519::ORGANIZATION_NAME, self.organization.as_deref()),
            (
                rfc4519::ORGANIZATIONAL_UNIT_NAME,
                self.organization_unit.as_deref(),
            ),
            (rfc4519::COMMON_NAME, Some(self.common_name.as_str())),
        ]
    }

    /// Converts the distinguished name to an X.509 `Name`, one attribute per RDN.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = Vec::new();
        for (oid, value) in self.attributes() {
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            // Country is PrintableString per RFC 5280; everything else is UTF8String.
            let tag = if oid == rfc4519::COUNTRY_NAME {
                Tag::PrintableString
            } else {
                Tag::Utf8String
            };
            let atv = AttributeTypeAndValue {
                oid,
                value: Any::new(tag, value.as_bytes().to_vec()).map_err(signing_error)?,
            };
            let set = SetOfVec::try_from(vec![atv]).map_err(signing_error)?;
            rdns.push(RelativeDistinguishedName(set));
        }
        Ok(RdnSequence(rdns))
    }

    /// Reads the attributes this crate knows about out of an X.509 `Name`.
    ///
    /// Unknown attribute types are skipped. A repeated attribute keeps its last value.
    pub fn from_x509_name(name: &Name) -> Self {
        let mut dn = DistinguishedName::default();
        for atv in name.0.iter().flat_map(|rdn| rdn.0.iter()) {
            let Some(value) = attribute_string(&atv.value) else {
                continue;
            };
            match atv.oid {
                rfc4519::COMMON_NAME => dn.common_name = value,
                rfc4519::COUNTRY_NAME => dn.country = Some(value),
                rfc4519::ST => dn.state = Some(value),
                rfc4519::LOCALITY_NAME => dn.locality = Some(value),
                rfc4519::ORGANIZATION_NAME => dn.organization = Some(value),
                rfc4519::ORGANIZATIONAL_UNIT_NAME => dn.organization_unit = Some(value),
                _ => {}
            }
        }
        dn
    }
}

fn attribute_string(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
            std::str::from_utf8(value.value()).ok().map(str::to_string)
        }
        _ => None,
    }
}

pub(crate) fn signing_error(err: impl std::fmt::Display) -> CertAideError {
    CertAideError::SigningError(err.to_string())
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A validity period starting now and lasting `years` calendar years.
    ///
    /// Sub-second precision is dropped since certificate times carry whole seconds.
    pub fn for_years(years: i32) -> Result<Self> {
        let now = OffsetDateTime::now_utc()
            .replace_nanosecond(0)
            .map_err(signing_error)?;
        Ok(Self {
            not_before: now,
            not_after: add_years(now, years)?,
        })
    }

    /// Length of the period.
    pub fn duration(&self) -> Duration {
        self.not_after - self.not_before
    }

    pub(crate) fn to_x509(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        })
    }

    pub(crate) fn from_x509(validity: &x509_cert::time::Validity) -> Self {
        Self {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }
}

/// Adds calendar years. 29 February rolls over to 1 March in non-leap years.
fn add_years(at: OffsetDateTime, years: i32) -> Result<OffsetDateTime> {
    let year = at.year() + years;
    match at.replace_year(year) {
        Ok(shifted) => Ok(shifted),
        Err(_) => {
            let shifted = at
                .replace_day(28)
                .and_then(|t| t.replace_year(year))
                .map_err(signing_error)?;
            Ok(shifted + Duration::days(1))
        }
    }
}

/// RFC 5280: UTCTime through 2049, GeneralizedTime from 2050 on.
fn to_x509_time(at: OffsetDateTime) -> Result<Time> {
    let system_time: std::time::SystemTime = at.into();
    let time = if at.year() < 2050 {
        Time::UtcTime(der::asn1::UtcTime::from_system_time(system_time).map_err(signing_error)?)
    } else {
        Time::GeneralTime(
            der::asn1::GeneralizedTime::from_system_time(system_time).map_err(signing_error)?,
        )
    };
    Ok(time)
}

/// Represents an X.509 extension.
///
/// This struct contains the OID, criticality, and value of an extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    ///
    /// Fails with [`CertAideError::SigningError`] when the value cannot be encoded.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }

    pub(crate) fn from_x509(ext: &x509_cert::ext::Extension) -> Self {
        Self {
            oid: ext.extn_id,
            critical: ext.critical,
            value: ext.extn_value.as_bytes().to_vec(),
        }
    }
}
