//! Digests and symmetric/asymmetric encryption helpers.
//!
//! * Digests: SHA-256 and MD5, raw or base64 encoded.
//! * AES-128 in ECB mode with PKCS#7 padding. The cipher key is the MD5
//!   digest of the caller's key bytes, so any key string can be used.
//! * RSA with PKCS#1 v1.5 padding. Keys are exchanged as DER: PKCS#8 for
//!   private keys and SubjectPublicKeyInfo for public keys.

use std::fmt;
use std::io::{Read, Write};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Encrypt;
use sha2::{Digest as _, Sha256};

use crate::codec::{encode_base64, encode_hex};
use crate::error::{CoreError, Result};

pub use rsa::{RsaPrivateKey, RsaPublicKey};

type Aes128EcbEnc = ecb::Encryptor<aes::Aes128>;
type Aes128EcbDec = ecb::Decryptor<aes::Aes128>;

/// Default RSA modulus size in bits.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Bytes of PKCS#1 v1.5 padding overhead per RSA block.
pub const PKCS1_PADDING_OVERHEAD: usize = 11;

// ============================================================================
// Digests
// ============================================================================

/// Supported message digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Md5,
}

impl DigestAlgorithm {
    /// Computes the digest of `value`.
    pub fn digest(self, value: impl AsRef<[u8]>) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(value.as_ref()).to_vec(),
            DigestAlgorithm::Md5 => md5::compute(value.as_ref()).0.to_vec(),
        }
    }

    /// Returns the conventional algorithm name.
    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Md5 => "MD5",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the digest of `value` with `algorithm`.
pub fn digest(algorithm: DigestAlgorithm, value: impl AsRef<[u8]>) -> Vec<u8> {
    algorithm.digest(value)
}

/// SHA-256 of the UTF-8 bytes of `value`, base64 encoded.
pub fn sha256_base64(value: &str) -> String {
    encode_base64(DigestAlgorithm::Sha256.digest(value))
}

/// MD5 of the UTF-8 bytes of `value`, base64 encoded.
pub fn md5_base64(value: &str) -> String {
    encode_base64(DigestAlgorithm::Md5.digest(value))
}

/// Lower-case hex digest of `value`.
pub fn checksum_hex(algorithm: DigestAlgorithm, value: impl AsRef<[u8]>) -> String {
    encode_hex(algorithm.digest(value))
}

// ============================================================================
// AES
// ============================================================================

fn aes_key(key: &[u8]) -> [u8; 16] {
    md5::compute(key).0
}

/// Encrypts `value` with AES-128/ECB/PKCS#7 under `MD5(key)`.
pub fn aes_encrypt(value: &[u8], key: &[u8]) -> Vec<u8> {
    Aes128EcbEnc::new(&aes_key(key).into()).encrypt_padded_vec_mut::<Pkcs7>(value)
}

/// Decrypts data produced by [`aes_encrypt`] with the same key.
pub fn aes_decrypt(value: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    Aes128EcbDec::new(&aes_key(key).into())
        .decrypt_padded_vec_mut::<Pkcs7>(value)
        .map_err(|_| CoreError::Padding)
}

/// Encrypts a string with a string key.
///
/// ```
/// use latalisa_core::crypto;
///
/// let secret = crypto::aes_encrypt_str("texto", "chave");
/// assert_eq!(crypto::aes_decrypt_str(&secret, "chave").unwrap(), "texto");
/// ```
pub fn aes_encrypt_str(value: &str, key: &str) -> Vec<u8> {
    aes_encrypt(value.as_bytes(), key.as_bytes())
}

/// Decrypts into a UTF-8 string with a string key.
pub fn aes_decrypt_str(value: &[u8], key: &str) -> Result<String> {
    Ok(String::from_utf8(aes_decrypt(value, key.as_bytes())?)?)
}

// ============================================================================
// RSA
// ============================================================================

/// An RSA private key together with its public half.
#[derive(Debug, Clone, PartialEq)]
pub struct RsaKeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl RsaKeyPair {
    /// Generates a key pair with the default modulus size.
    pub fn generate() -> Result<Self> {
        Self::generate_with_bits(DEFAULT_RSA_BITS)
    }

    /// Generates a key pair with a modulus of `bits` bits.
    pub fn generate_with_bits(bits: usize) -> Result<Self> {
        let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)?;
        tracing::debug!(bits, "generated RSA key pair");
        Ok(Self::from_private(private))
    }

    /// Builds a pair from a private key, deriving the public half.
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        RsaKeyPair { private, public }
    }

    /// Imports a pair from PKCS#8 (private) and SPKI (public) DER bytes.
    pub fn from_der(private: &[u8], public: &[u8]) -> Result<Self> {
        Ok(RsaKeyPair {
            private: private_key_from_der(private)?,
            public: public_key_from_der(public)?,
        })
    }

    /// Imports a pair by reading both DER documents to the end.
    pub fn read_der<P: Read, U: Read>(mut private: P, mut public: U) -> Result<Self> {
        let (mut private_der, mut public_der) = (Vec::new(), Vec::new());
        private.read_to_end(&mut private_der)?;
        public.read_to_end(&mut public_der)?;
        Self::from_der(&private_der, &public_der)
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Encodes the private key as PKCS#8 DER.
    pub fn private_der(&self) -> Result<Vec<u8>> {
        Ok(self.private.to_pkcs8_der()?.as_bytes().to_vec())
    }

    /// Encodes the public key as SPKI DER.
    pub fn public_der(&self) -> Result<Vec<u8>> {
        Ok(self.public.to_public_key_der()?.into_vec())
    }

    /// Writes both keys as DER and flushes the writers.
    pub fn write_der<P: Write, U: Write>(&self, mut private: P, mut public: U) -> Result<()> {
        private.write_all(&self.private_der()?)?;
        private.flush()?;
        public.write_all(&self.public_der()?)?;
        public.flush()?;
        Ok(())
    }
}

/// Decodes a PKCS#8 DER private key.
pub fn private_key_from_der(der: &[u8]) -> Result<RsaPrivateKey> {
    Ok(RsaPrivateKey::from_pkcs8_der(der)?)
}

/// Decodes an SPKI DER public key.
pub fn public_key_from_der(der: &[u8]) -> Result<RsaPublicKey> {
    Ok(RsaPublicKey::from_public_key_der(der)?)
}

/// Largest plaintext that fits in a single PKCS#1 v1.5 block for `key`.
pub fn max_plaintext_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(PKCS1_PADDING_OVERHEAD)
}

/// Encrypts one block with the public key.
pub fn rsa_encrypt(key: &RsaPublicKey, value: &[u8]) -> Result<Vec<u8>> {
    Ok(key.encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, value)?)
}

/// Decrypts one block with the private key.
pub fn rsa_decrypt(key: &RsaPrivateKey, value: &[u8]) -> Result<Vec<u8>> {
    Ok(key.decrypt(Pkcs1v15Encrypt, value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static KEYS: Lazy<RsaKeyPair> = Lazy::new(|| RsaKeyPair::generate_with_bits(1024).unwrap());

    #[test]
    fn digests_are_deterministic() {
        assert_eq!(
            checksum_hex(DigestAlgorithm::Sha256, "abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            checksum_hex(DigestAlgorithm::Md5, "abc"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(sha256_base64("abc"), sha256_base64("abc"));
        assert_eq!(md5_base64(""), "1B2M2Y8AsgTpgAmY7PhCfg==");
    }

    #[test]
    fn aes_round_trip() {
        let encrypted = aes_encrypt(b"mensagem secreta", b"minha chave");
        assert_eq!(encrypted.len(), 32);
        assert_eq!(aes_decrypt(&encrypted, b"minha chave").unwrap(), b"mensagem secreta");
    }

    #[test]
    fn aes_wrong_key_fails_or_differs() {
        let encrypted = aes_encrypt_str("mensagem", "certa");
        let decrypted = aes_decrypt_str(&encrypted, "errada");
        assert!(decrypted.map_or(true, |text| text != "mensagem"));
    }

    #[test]
    fn rsa_round_trip_and_der_import() {
        let keys = &*KEYS;
        let encrypted = rsa_encrypt(keys.public_key(), b"ola").unwrap();
        assert_eq!(rsa_decrypt(keys.private_key(), &encrypted).unwrap(), b"ola");

        let imported = RsaKeyPair::from_der(&keys.private_der().unwrap(), &keys.public_der().unwrap())
            .unwrap();
        assert_eq!(&imported, keys);
        assert_eq!(max_plaintext_len(keys.public_key()), 128 - 11);
    }

    #[test]
    fn der_write_then_read() {
        let keys = &*KEYS;
        let (mut private, mut public) = (Vec::new(), Vec::new());
        keys.write_der(&mut private, &mut public).unwrap();
        let read = RsaKeyPair::read_der(private.as_slice(), public.as_slice()).unwrap();
        assert_eq!(&read, keys);
    }

    #[test]
    fn invalid_der_is_an_error() {
        assert!(matches!(private_key_from_der(b"junk"), Err(CoreError::PrivateKey(_))));
        assert!(matches!(public_key_from_der(b"junk"), Err(CoreError::PublicKey(_))));
    }
}
