use std::env;

/// Media/document delivery configuration. Files live behind a storage
/// backend reachable at `public_base_url`; access goes through expiring
/// HMAC-signed URLs (see `utils::signed_url`).
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub public_base_url: String,
    pub signing_secret: String,
    pub url_ttl_seconds: i64,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            public_base_url: env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            signing_secret: env::var("STORAGE_SIGNING_SECRET")
                .unwrap_or_else(|_| "storage-signing-secret-change-in-production".to_string()),
            url_ttl_seconds: env::var("STORAGE_URL_TTL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        }
    }
}
