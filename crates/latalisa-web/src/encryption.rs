//! RSA body encryption.
//!
//! Keys travel as request [`Properties`]: an `RsaPublicKey` under
//! [`PUBLIC_KEY`] for encrypting response bodies, an `RsaPrivateKey` under
//! [`PRIVATE_KEY`] for decrypting request bodies. Bodies longer than one
//! RSA block are split into PKCS#1 v1.5 sized chunks.

use latalisa_core::crypto::{max_plaintext_len, rsa_decrypt, rsa_encrypt, RsaPrivateKey, RsaPublicKey};
use rsa::traits::PublicKeyParts;
use tracing::debug;

use crate::error::{Rejection, Result};
use crate::http::Properties;

pub const PUBLIC_KEY: &str = "PublicKey";
pub const PRIVATE_KEY: &str = "PrivateKey";

#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptionInterceptor;

impl EncryptionInterceptor {
    /// Encrypts a response body with the public key in `properties`.
    pub fn encrypt_body(&self, properties: &Properties, body: &[u8]) -> Result<Vec<u8>> {
        let key = properties
            .get::<RsaPublicKey>(PUBLIC_KEY)
            .ok_or_else(|| Rejection::bad_request("public key not provided"))?;
        let chunk = max_plaintext_len(key);
        let mut encrypted = Vec::with_capacity(body.len().div_ceil(chunk.max(1)) * key.size());
        for block in body.chunks(chunk.max(1)) {
            encrypted.extend(rsa_encrypt(key, block)?);
        }
        debug!(plain = body.len(), encrypted = encrypted.len(), "body encrypted");
        Ok(encrypted)
    }

    /// Decrypts a request body with the private key in `properties`.
    pub fn decrypt_body(&self, properties: &Properties, body: &[u8]) -> Result<Vec<u8>> {
        let key = properties
            .get::<RsaPrivateKey>(PRIVATE_KEY)
            .ok_or_else(|| Rejection::bad_request("private key not provided"))?;
        let block = key.size();
        if body.len() % block != 0 {
            return Err(Rejection::bad_request("encrypted body is not a whole number of blocks").into());
        }
        let mut decrypted = Vec::with_capacity(body.len());
        for chunk in body.chunks(block) {
            decrypted.extend(rsa_decrypt(key, chunk)?);
        }
        Ok(decrypted)
    }
}
