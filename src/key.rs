use std::fmt;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use tracing::debug;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{CertAideError, Result};
use crate::pem_utils::{self, PemKind};

/// Length in bytes of a derived key identifier.
pub const KEY_ID_LEN: usize = 20;

/// The role a key pair is generated for. Each role maps to one modulus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Root,
    Leaf,
}

impl KeyRole {
    /// RSA modulus size in bits for this role.
    pub const fn modulus_bits(self) -> usize {
        match self {
            KeyRole::Root => 4096,
            KeyRole::Leaf => 2048,
        }
    }
}

/// An RSA key pair. The only key type this crate issues with.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate an RSA key pair sized for `role`, drawing from the OS CSPRNG.
    pub fn generate(role: KeyRole) -> Result<Self> {
        let bits = role.modulus_bits();
        debug!(?role, bits, "generating RSA key pair");
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertAideError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_private(private))
    }

    fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair {
            private: Box::new(private),
            public,
        }
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    /// The public half as a `SubjectPublicKeyInfo`.
    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        public_key_info(&self.public)
    }

    /// SHA-1 of the public key's canonical encoding; see [`derive_key_id`].
    pub fn key_id(&self) -> Result<[u8; KEY_ID_LEN]> {
        derive_key_id(&self.public)
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key = RsaSigningKey::<Sha256>::new((*self.private).clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CertAideError::SigningError(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// PKCS#8 DER encoding of the private key.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        let doc = self.private.to_pkcs8_der()?;
        Ok(doc.as_bytes().to_vec())
    }

    /// PKCS#8 PEM (`PRIVATE KEY`) encoding of the private key.
    pub fn to_pkcs8_pem(&self) -> Result<String> {
        Ok(pem_utils::encode_pem(PemKind::PrivateKey, &self.to_pkcs8_der()?))
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        Ok(Self::from_private(RsaPrivateKey::from_pkcs8_der(der)?))
    }

    /// Legacy read path for `RSA PRIVATE KEY` material.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        Ok(Self::from_private(RsaPrivateKey::from_pkcs1_der(der)?))
    }

    /// Loads a private key from PEM or raw DER, in either PKCS#8 or PKCS#1 form.
    ///
    /// PEM input is recognised by its `-----BEGIN ` prefix. Raw DER is tried as
    /// PKCS#8 first and then as PKCS#1.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if pem_utils::is_pem(bytes) {
            let (kind, der) = pem_utils::decode_pem(bytes)?;
            return match kind {
                PemKind::PrivateKey => Self::from_pkcs8_der(&der),
                PemKind::RsaPrivateKey => Self::from_pkcs1_der(&der),
                PemKind::Certificate => Err(CertAideError::InvalidPem(
                    "expected a private key, found CERTIFICATE".to_string(),
                )),
            };
        }

        Self::from_pkcs8_der(bytes).or_else(|_| Self::from_pkcs1_der(bytes))
    }
}

/// Derives the 160-bit key identifier of `public`.
///
/// This is the SHA-1 of the DER `SubjectPublicKeyInfo`. It names a key, it is
/// not a security boundary.
/// The `SubjectPublicKeyInfo` written into a certificate for `public`.
pub fn public_key_info(public: &RsaPublicKey) -> Result<SubjectPublicKeyInfoOwned> {
    Ok(SubjectPublicKeyInfoOwned::from_key(public.clone())?)
}

pub fn derive_key_id(public: &RsaPublicKey) -> Result<[u8; KEY_ID_LEN]> {
    let spki = public.to_public_key_der()?;
    Ok(Sha1::digest(spki.as_bytes()).into())
}
