//! The root of trust and the leaf issuance built on top of it.

use tracing::info;

use crate::cert::{Certificate, CertificateDetails};
use crate::config::CertConfig;
use crate::error::Result;
use crate::issuer::{self, CertificateIssuer, Issuer};
use crate::key::{KeyPair, KeyRole};
use crate::template::{build_leaf_template, build_root_template};

/// A CA certificate together with its private key.
///
/// The key is assumed to match the certificate; [`CertificateAuthority::load`]
/// does not check it. Once built, the value is only ever read, so one authority
/// can serve concurrent issuance calls.
#[derive(Debug, Clone)]
pub struct CertificateAuthority {
    pub certificate: Certificate,
    pub key: KeyPair,
}

/// PEM output of a leaf issuance.
#[derive(Debug, Clone)]
pub struct IssuedLeaf {
    pub certificate_pem: String,
    /// PKCS#8 `PRIVATE KEY` block.
    pub private_key_pem: String,
}

impl CertificateAuthority {
    /// Generates a fresh RSA-4096 key and a self-signed root certificate for it.
    pub fn generate_root(config: &CertConfig) -> Result<Self> {
        info!(bits = KeyRole::Root.modulus_bits(), "generating root CA");

        let key = KeyPair::generate(KeyRole::Root)?;
        let template = build_root_template(key.public_key(), config)?;
        let certificate = issuer::sign(&template, key.public_key(), None, &key)?;

        info!(
            serial = template.serial_number.as_u128(),
            subject = %certificate.subject_name(),
            "root CA generated"
        );
        Ok(Self { certificate, key })
    }

    /// Rebuilds an authority from stored certificate and key bytes.
    ///
    /// The certificate may be PEM or DER; the key may be PKCS#8 or PKCS#1, PEM or DER.
    pub fn load(certificate: &[u8], key: &[u8]) -> Result<Self> {
        Ok(Self {
            certificate: Certificate::parse(certificate)?,
            key: KeyPair::from_bytes(key)?,
        })
    }

    /// The root certificate as a `CERTIFICATE` PEM block.
    pub fn certificate_pem(&self) -> Result<String> {
        self.certificate.to_pem()
    }

    /// The root key as a PKCS#8 `PRIVATE KEY` PEM block.
    pub fn private_key_pem(&self) -> Result<String> {
        self.key.to_pkcs8_pem()
    }

    /// Issues a server certificate for `hosts` under this authority.
    ///
    /// A fresh RSA-2048 key is generated for the leaf. `hosts[0]` becomes the
    /// common name; every host becomes a SAN entry.
    pub fn issue_leaf<S: AsRef<str>>(&self, hosts: &[S], config: &CertConfig) -> Result<IssuedLeaf> {
        let key = KeyPair::generate(KeyRole::Leaf)?;
        let template = build_leaf_template(key.public_key(), hosts, config)?;
        let certificate = CertificateIssuer {
            certificate: &self.certificate,
            key: &self.key,
        }
        .issue(&template, key.public_key())?;

        info!(
            serial = template.serial_number.as_u128(),
            common_name = %template.subject.common_name,
            hosts = hosts.len(),
            "leaf certificate issued"
        );
        Ok(IssuedLeaf {
            certificate_pem: certificate.to_pem()?,
            private_key_pem: key.to_pkcs8_pem()?,
        })
    }
}

/// Parses a PEM or DER certificate and returns its inspectable fields.
///
/// Nothing is returned unless the whole certificate parses.
pub fn inspect(certificate: &[u8]) -> Result<CertificateDetails> {
    Certificate::parse(certificate)?.details()
}
