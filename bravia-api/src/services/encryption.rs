//! Encryption service - encrypted communication with the display
//!
//! Text field access requires AES-encrypted payloads. A random AES key and
//! initialization vector are generated per client and sent to the device
//! encrypted under its RSA public key.

use crate::client::BraviaClient;
use crate::error::{Error, ErrorCode, Result};
use crate::service::Service;
use crate::services::required;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use serde::Deserialize;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// AES key material shared with the display for the life of a client
#[derive(Debug, Clone)]
pub(crate) struct CipherState {
    key: [u8; 16],
    iv: [u8; 16],
}

impl CipherState {
    pub(crate) fn generate() -> Self {
        let mut key = [0u8; 16];
        let mut iv = [0u8; 16];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Encrypt the AES key material under the device's RSA public key
    pub(crate) fn rsa_encrypt_common_key(&self, public_key_b64: &str) -> Result<String> {
        let der = BASE64.decode(public_key_b64).map_err(|e| {
            Error::Encryption(format!("the device sent an invalid public key: {}", e))
        })?;
        let public_key = RsaPublicKey::from_public_key_der(&der)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
            .map_err(|e| {
                Error::Encryption(format!("the device sent an unusable public key: {}", e))
            })?;

        // The device expects the AES key's hex representation concatenated
        // with the initialization vector's hex representation. This is
        // undocumented.
        let payload = format!("{}:{}", hex(&self.key), hex(&self.iv));

        let encrypted = public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, payload.as_bytes())
            .map_err(|e| Error::Encryption(format!("RSA encryption failed: {}", e)))?;
        Ok(BASE64.encode(encrypted))
    }

    /// AES-encrypt a message for the device, returning base64
    pub(crate) fn encrypt(&self, message: &str) -> String {
        let cipher = Aes128CbcEnc::new(&self.key.into(), &self.iv.into());
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(message.as_bytes());
        BASE64.encode(ciphertext)
    }

    /// Decrypt a base64 AES message sent from the device
    pub(crate) fn decrypt(&self, message: &str) -> Result<String> {
        let ciphertext = BASE64.decode(message).map_err(|e| {
            Error::Encryption(format!("the device sent invalid base64 ciphertext: {}", e))
        })?;
        let cipher = Aes128CbcDec::new(&self.key.into(), &self.iv.into());
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| Error::Encryption("the ciphertext has invalid padding".to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|_| Error::Encryption("the decrypted text is not valid UTF-8".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct PublicKeyPayload {
    #[serde(rename = "publicKey")]
    public_key: String,
}

/// Provides functionality for encrypted communication with the display
pub struct Encryption<'a> {
    client: &'a BraviaClient,
}

impl<'a> Encryption<'a> {
    pub(crate) fn new(client: &'a BraviaClient) -> Self {
        Self { client }
    }

    /// Return the display's public encryption key, base64-encoded
    ///
    /// Returns `None` if the device does not have a public key.
    pub fn get_public_key(&self) -> Result<Option<String>> {
        let payload = match self
            .client
            .request(Service::Encryption, "getPublicKey", None, "1.0")
        {
            Err(e) if e.code() == Some(ErrorCode::KeyDoesNotExist) => return Ok(None),
            other => required(other?, "getPublicKey")?,
        };
        let key: PublicKeyPayload = serde_json::from_value(payload)?;
        Ok(Some(key.public_key))
    }

    /// Return the client's AES common key, encrypted for the display
    ///
    /// The key is generated when the client is constructed and reused for
    /// its whole life. Returns `None` if the device has no encryption
    /// capability.
    pub fn rsa_encrypted_common_key(&self) -> Result<Option<String>> {
        let Some(public_key) = self.get_public_key()? else {
            return Ok(None);
        };
        let encrypted = self.client.cipher().rsa_encrypt_common_key(&public_key)?;
        Ok(Some(encrypted))
    }

    /// Encrypt a message to be sent to the display
    pub fn encrypt(&self, message: &str) -> String {
        self.client.cipher().encrypt(message)
    }

    /// Decrypt a message sent from the display
    pub fn decrypt(&self, message: &str) -> Result<String> {
        self.client.cipher().decrypt(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_state() -> CipherState {
        CipherState {
            key: [0x11; 16],
            iv: [0x22; 16],
        }
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(hex(&[0x0f, 0xa0, 0x00]), "0fa000");
    }

    #[test]
    fn test_generate_produces_fresh_material() {
        let a = CipherState::generate();
        let b = CipherState::generate();
        assert_ne!(a.key, b.key);
        assert_ne!(a.iv, b.iv);
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let state = fixed_state();
        let encrypted = state.encrypt("search terms");
        assert_ne!(encrypted, "search terms");
        assert_eq!(state.decrypt(&encrypted).unwrap(), "search terms");
    }

    #[test]
    fn test_decrypt_rejects_invalid_base64() {
        let state = fixed_state();
        let result = state.decrypt("not base64!");
        assert!(matches!(result, Err(Error::Encryption(_))));
    }

    #[test]
    fn test_rsa_encrypt_rejects_garbage_key() {
        let state = fixed_state();

        let result = state.rsa_encrypt_common_key("###");
        assert!(matches!(result, Err(Error::Encryption(_))));

        let garbage_der = BASE64.encode([0u8; 64]);
        let result = state.rsa_encrypt_common_key(&garbage_der);
        assert!(matches!(result, Err(Error::Encryption(_))));
    }
}
