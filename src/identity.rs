//! Classification of free-form host strings into Subject Alternative Names.
//!
//! Each host is tested against an ordered list of classifiers and the first
//! match wins:
//!
//! 1. IP literal (IPv4 or IPv6)
//! 2. bare email address (`local@domain`, nothing else)
//! 3. absolute URI with a scheme and a non-empty host
//! 4. anything else is taken as a DNS name, unvalidated
//!
//! The order matters. `127.0.0.1` is also a syntactically acceptable DNS label
//! sequence and `a@b.com` is also a plausible hostname to a lax parser, so
//! testing DNS earlier would misfile them.

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{CertAideError, Result};

/// `atext` from RFC 5322 plus any non-ASCII character.
const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\-\x{80}-\x{10FFFF}]+";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{ATEXT}(?:\.{ATEXT})*@{ATEXT}(?:\.{ATEXT})*$"))
        .expect("invalid email regex")
});

/// A single Subject Alternative Name entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanEntry {
    Ip(IpAddr),
    Email(String),
    /// The URI exactly as supplied; it has been checked to carry a scheme and a host.
    Uri(String),
    Dns(String),
}

impl SanEntry {
    /// Classifies one host string. Never fails: unmatched input becomes a DNS name.
    pub fn classify(host: &str) -> Self {
        CLASSIFIERS
            .iter()
            .find_map(|classify| classify(host))
            .unwrap_or_else(|| SanEntry::Dns(host.to_string()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SanEntry::Ip(_) => "IP",
            SanEntry::Email(_) => "email",
            SanEntry::Uri(_) => "URI",
            SanEntry::Dns(_) => "DNS",
        }
    }
}

impl fmt::Display for SanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanEntry::Ip(ip) => write!(f, "IP:{ip}"),
            SanEntry::Email(email) => write!(f, "email:{email}"),
            SanEntry::Uri(uri) => write!(f, "URI:{uri}"),
            SanEntry::Dns(name) => write!(f, "DNS:{name}"),
        }
    }
}

type Classifier = fn(&str) -> Option<SanEntry>;

/// Tried in order; DNS is the fallback and has no entry.
const CLASSIFIERS: [Classifier; 3] = [as_ip, as_email, as_uri];

fn as_ip(host: &str) -> Option<SanEntry> {
    host.parse::<IpAddr>().ok().map(SanEntry::Ip)
}

fn as_email(host: &str) -> Option<SanEntry> {
    EMAIL_REGEX
        .is_match(host)
        .then(|| SanEntry::Email(host.to_string()))
}

/// `scheme "://"` with an RFC 3986 scheme. Whitespace and control characters
/// are rejected up front because the URL parser would silently strip them.
fn has_authority_form(host: &str) -> bool {
    if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((scheme, rest)) = host.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && rest.starts_with("//")
}

fn as_uri(host: &str) -> Option<SanEntry> {
    if !has_authority_form(host) {
        return None;
    }
    let uri = Url::parse(host).ok()?;
    let has_host = uri.host_str().is_some_and(|h| !h.is_empty());
    (!uri.scheme().is_empty() && has_host).then(|| SanEntry::Uri(host.to_string()))
}

/// Classifies every host, preserving order.
///
/// Fails with [`CertAideError::EmptyHostList`] when `hosts` is empty, since the
/// first host doubles as the certificate's common name.
pub fn classify<S: AsRef<str>>(hosts: &[S]) -> Result<Vec<SanEntry>> {
    if hosts.is_empty() {
        return Err(CertAideError::EmptyHostList);
    }

    Ok(hosts
        .iter()
        .map(|host| {
            let entry = SanEntry::classify(host.as_ref());
            debug!(host = host.as_ref(), kind = entry.kind(), "classified host");
            entry
        })
        .collect())
}
