use crate::domain::otp::CodeHasher;
use crate::domain::phone::PhoneNumber;
use anyhow::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `phone_number:code`, keyed with a server-side secret.
///
/// Binding the phone number into the digest means the same six digits issued to two
/// numbers never produce the same stored value.
#[derive(Clone)]
pub struct HmacCodeHasher {
    secret: Vec<u8>,
}

impl HmacCodeHasher {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            anyhow::bail!("OTP secret must not be empty");
        }
        Ok(Self { secret })
    }

    fn mac(&self, phone_number: &PhoneNumber, code: &str) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| anyhow::anyhow!("Invalid OTP secret: {}", e))?;
        mac.update(phone_number.as_str().as_bytes());
        mac.update(b":");
        mac.update(code.as_bytes());
        Ok(mac)
    }
}

impl CodeHasher for HmacCodeHasher {
    fn hash_code(&self, phone_number: &PhoneNumber, code: &str) -> Result<String> {
        let mac = self.mac(phone_number, code)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn verify_code(&self, phone_number: &PhoneNumber, code: &str, code_hash: &str) -> Result<bool> {
        let expected = match hex::decode(code_hash) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Stored code hash is not valid hex: {}", e);
                return Ok(false);
            }
        };
        // verify_slice compares in constant time
        Ok(self.mac(phone_number, code)?.verify_slice(&expected).is_ok())
    }
}
