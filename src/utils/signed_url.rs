//! Expiring signed URLs for stored media and documents.
//!
//! Files are addressed by an opaque storage key; clients receive a URL of
//! the form `{base}/{key}?expires={ts}&signature={hex}` where the signature
//! is an HMAC-SHA256 over `key:expires`. The storage frontend verifies the
//! same MAC before serving the file.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::storage::StorageConfig;

type HmacSha256 = Hmac<Sha256>;

fn sign(key: &str, expires: i64, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{}:{}", key, expires).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a signed, expiring URL for a storage key.
pub fn signed_url(config: &StorageConfig, key: &str) -> String {
    let expires = Utc::now().timestamp() + config.url_ttl_seconds;
    let signature = sign(key, expires, &config.signing_secret);
    format!(
        "{}/{}?expires={}&signature={}",
        config.public_base_url.trim_end_matches('/'),
        key,
        expires,
        signature
    )
}

/// Verify a signature produced by [`signed_url`]. Used by the file
/// delivery endpoint.
pub fn verify_signature(config: &StorageConfig, key: &str, expires: i64, signature: &str) -> bool {
    if expires < Utc::now().timestamp() {
        return false;
    }
    // Constant-time comparison via the Mac verify API
    let mut mac = HmacSha256::new_from_slice(config.signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(format!("{}:{}", key, expires).as_bytes());
    match hex::decode(signature) {
        Ok(bytes) => mac.verify_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StorageConfig {
        StorageConfig {
            public_base_url: "http://localhost:3000/files/".to_string(),
            signing_secret: "unit-test-secret".to_string(),
            url_ttl_seconds: 600,
        }
    }

    #[test]
    fn test_signed_url_shape() {
        let url = signed_url(&test_config(), "properties/abc.png");
        assert!(url.starts_with("http://localhost:3000/files/properties/abc.png?expires="));
        assert!(url.contains("&signature="));
    }

    #[test]
    fn test_signature_round_trip() {
        let config = test_config();
        let expires = Utc::now().timestamp() + 600;
        let signature = sign("contracts/doc.pdf", expires, &config.signing_secret);
        assert!(verify_signature(&config, "contracts/doc.pdf", expires, &signature));
    }

    #[test]
    fn test_tampered_key_rejected() {
        let config = test_config();
        let expires = Utc::now().timestamp() + 600;
        let signature = sign("contracts/doc.pdf", expires, &config.signing_secret);
        assert!(!verify_signature(&config, "contracts/other.pdf", expires, &signature));
    }

    #[test]
    fn test_expired_signature_rejected() {
        let config = test_config();
        let expires = Utc::now().timestamp() - 10;
        let signature = sign("contracts/doc.pdf", expires, &config.signing_secret);
        assert!(!verify_signature(&config, "contracts/doc.pdf", expires, &signature));
    }
}
