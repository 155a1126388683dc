//! Unsigned certificate descriptors for the two certificate roles.

use rand_core::{OsRng, RngCore};
use rsa::RsaPublicKey;
use tracing::debug;

use crate::cert::extensions::{
    BasicConstraints, ExtendedKeyUsageOption, KeyUsage, KeyUsages, SubjectAltName,
};
use crate::cert::params::{DistinguishedName, Validity};
use crate::config::CertConfig;
use crate::error::{CertAideError, Result};
use crate::identity;
use crate::key::derive_key_id;

/// Width of a freshly drawn serial number.
pub const SERIAL_NUMBER_BYTES: usize = 16;

/// A certificate serial number, uniformly random in `[0, 2^128)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber([u8; SERIAL_NUMBER_BYTES]);

impl SerialNumber {
    /// Draws a serial from the OS CSPRNG. An entropy failure is fatal, not retried.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; SERIAL_NUMBER_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CertAideError::KeyGenerationError(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Minimal big-endian encoding of a positive DER INTEGER.
    pub fn to_der_integer_bytes(&self) -> Vec<u8> {
        let first = self
            .0
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(SERIAL_NUMBER_BYTES - 1);
        let digits = &self.0[first..];
        let mut out = Vec::with_capacity(digits.len() + 1);
        if digits[0] & 0x80 != 0 {
            out.push(0);
        }
        out.extend_from_slice(digits);
        out
    }
}

impl From<u128> for SerialNumber {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

/// An unsigned certificate: everything but the issuer and the signature.
#[derive(Debug, Clone)]
pub struct CertificateTemplate {
    pub serial_number: SerialNumber,
    pub subject: DistinguishedName,
    pub validity: Validity,
    pub key_usage: KeyUsage,
    pub extended_key_usage: Vec<ExtendedKeyUsageOption>,
    pub basic_constraints: BasicConstraints,
    pub subject_key_id: Vec<u8>,
    pub subject_alt_name: SubjectAltName,
}

/// Template for a self-signed root: CA with path length zero, certificate signing only.
pub fn build_root_template(
    public_key: &RsaPublicKey,
    config: &CertConfig,
) -> Result<CertificateTemplate> {
    let subject = DistinguishedName::builder()
        .common_name(config.root_common_name.clone())
        .organization(config.root_organization.clone())
        .build();

    Ok(CertificateTemplate {
        serial_number: SerialNumber::random()?,
        subject,
        validity: Validity::for_years(config.root_validity_years)?,
        key_usage: KeyUsage(KeyUsages::KeyCertSign.into()),
        extended_key_usage: vec![ExtendedKeyUsageOption::ServerAuth],
        basic_constraints: BasicConstraints {
            is_ca: true,
            max_path_length: Some(0),
        },
        subject_key_id: derive_key_id(public_key)?.to_vec(),
        subject_alt_name: SubjectAltName::default(),
    })
}

/// Template for a server certificate covering `hosts`.
///
/// The first host doubles as the common name, for clients that still only read CN.
pub fn build_leaf_template<S: AsRef<str>>(
    public_key: &RsaPublicKey,
    hosts: &[S],
    config: &CertConfig,
) -> Result<CertificateTemplate> {
    let names = identity::classify(hosts)?;
    let common_name = hosts[0].as_ref().to_string();

    let subject = DistinguishedName::builder()
        .common_name(common_name)
        .organization(config.organization.clone())
        .organization_unit(caller_identity())
        .country(config.country.clone())
        .locality(config.locality.clone())
        .state(config.province.clone())
        .build();

    Ok(CertificateTemplate {
        serial_number: SerialNumber::random()?,
        subject,
        validity: Validity::for_years(config.leaf_validity_years)?,
        key_usage: KeyUsage(
            KeyUsages::KeyEncipherment | KeyUsages::DigitalSignature | KeyUsages::NonRepudiation,
        ),
        extended_key_usage: Vec::new(),
        basic_constraints: BasicConstraints::default(),
        subject_key_id: derive_key_id(public_key)?.to_vec(),
        subject_alt_name: SubjectAltName { names },
    })
}

/// `user@host (Full Name)` for the account running the process.
///
/// Best effort: every lookup that fails contributes an empty string instead of
/// failing the issuance, so the result may be `"host"`, `"user@"` or empty.
pub fn caller_identity() -> String {
    let user = whoami::fallible::username().unwrap_or_else(|e| {
        debug!(error = %e, "user name unavailable for organizational unit");
        String::new()
    });
    let host = gethostname::gethostname().into_string().unwrap_or_else(|raw| {
        debug!(host = ?raw, "host name is not valid UTF-8");
        String::new()
    });
    let real_name = whoami::fallible::realname().unwrap_or_default();

    format_caller_identity(&user, &host, &real_name)
}

fn format_caller_identity(user: &str, host: &str, real_name: &str) -> String {
    let mut identity = String::new();
    if !user.is_empty() {
        identity.push_str(user);
        identity.push('@');
    }
    identity.push_str(host);
    if !user.is_empty() && !real_name.is_empty() && real_name != user {
        identity.push_str(&format!(" ({real_name})"));
    }
    identity
}
