//! # CertAide - A Small Private Certificate Authority
//!
//! CertAide bootstraps a self-signed RSA root certificate and uses it to issue
//! short-lived server certificates for whatever identities a service answers to:
//! IP addresses, DNS names, email addresses and URIs. It is built entirely on
//! rustcrypto libraries and is meant for development tooling, internal service
//! meshes and local TLS test harnesses that need a private trust root.
//!
//! ## Certificates Produced
//!
//! - **Root**: RSA-4096, self-signed, `CA:TRUE, pathlen:0`, key usage
//!   certificate signing only, valid for 100 years.
//! - **Leaf**: RSA-2048, signed by the root, `CA:FALSE`, key usage key
//!   encipherment, digital signature and content commitment, valid for 1 year.
//!
//! Both are signed with SHA-256 with RSA encryption and carry a Subject Key
//! Identifier; leaves also carry an Authority Key Identifier pointing at the root.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use certaide::{authority::CertificateAuthority, config::CertConfig};
//!
//! # fn main() -> Result<(), certaide::error::CertAideError> {
//! let config = CertConfig::default();
//!
//! // Bootstrap a root and keep it around
//! let ca = CertificateAuthority::generate_root(&config)?;
//! let root_pem = ca.certificate_pem()?;
//! let root_key_pem = ca.private_key_pem()?;
//!
//! // Later: reload it and issue a leaf
//! let ca = CertificateAuthority::load(root_pem.as_bytes(), root_key_pem.as_bytes())?;
//! let leaf = ca.issue_leaf(&["127.0.0.1", "localhost", "ops@example.com"], &config)?;
//!
//! let details = certaide::authority::inspect(leaf.certificate_pem.as_bytes())?;
//! println!("expires {}", details.not_after);
//! # Ok(())
//! # }
//! ```
//!
//! ## Host Classification
//!
//! Each host string is classified into exactly one SAN type, tried in order:
//! IP literal, bare email address, absolute URI with a host, and finally DNS
//! name as a permissive fallback. See [`identity`].
//!
//! ```rust
//! use certaide::identity::{classify, SanEntry};
//!
//! let sans = classify(&["10.0.0.1", "a@b.com", "https://example.com", "example.com"]).unwrap();
//! assert!(matches!(sans[0], SanEntry::Ip(_)));
//! assert!(matches!(sans[1], SanEntry::Email(_)));
//! assert!(matches!(sans[2], SanEntry::Uri(_)));
//! assert!(matches!(sans[3], SanEntry::Dns(_)));
//! ```
//!
//! ## Error Handling
//!
//! Every failure comes back as a [`error::CertAideError`]; nothing is retried or
//! silently defaulted:
//!
//! ```rust
//! use certaide::{authority, error::CertAideError};
//!
//! match authority::inspect(b"-----BEGIN CERTIFICATE-----\nMIIB") {
//!     Ok(details) => println!("serial {}", details.serial_hex()),
//!     Err(CertAideError::CertificateParseError(msg)) => println!("bad certificate: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`authority`]: root generation, loading, leaf issuance and inspection
//! - [`key`]: RSA key generation, key identifiers, PKCS#8/PKCS#1 import and export
//! - [`identity`]: host string to SAN classification
//! - [`template`]: root and leaf certificate templates
//! - [`issuer`]: signing templates into certificates
//! - [`cert`]: certificate encoding, parsing and X.509 extensions
//! - [`pem_utils`]: PEM envelopes
//! - [`config`]: subject branding and validity periods
//! - [`fs`], [`local`]: file access and local interface addresses for callers
//! - [`error`]: error types

pub mod authority;
pub mod cert;
pub mod config;
pub mod error;
pub mod fs;
pub mod identity;
pub mod issuer;
pub mod key;
pub mod local;
pub mod pem_utils;
pub mod tbs_certificate;
pub mod template;
