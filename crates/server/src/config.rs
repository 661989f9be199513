//! Environment-derived configuration (spec.md §6 "Environment inputs").

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub cache_url: String,
    /// 32-byte AES-256-GCM key, base64-encoded, for at-rest PII.
    pub pii_encryption_key: String,
    /// HMAC key guarding cached wallet payload integrity.
    pub cache_hmac_key: String,
    pub jwt_signing_key: String,
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    #[serde(default = "default_jwt_ttl_seconds")]
    pub jwt_ttl_seconds: i64,
    #[serde(default)]
    pub allowed_hosts: String,
    #[serde(default)]
    pub ip_allow_list: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_l1_capacity")]
    pub l1_cache_capacity: usize,
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_jwt_ttl_seconds() -> i64 {
    3600
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_l1_capacity() -> usize {
    10_000
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("CASINO_").from_env()
    }

    pub fn jwt_algorithm(&self) -> jsonwebtoken::Algorithm {
        match self.jwt_algorithm.as_str() {
            "HS384" => jsonwebtoken::Algorithm::HS384,
            "HS512" => jsonwebtoken::Algorithm::HS512,
            _ => jsonwebtoken::Algorithm::HS256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_with_algorithm(jwt_algorithm: &str) -> Config {
        Config {
            database_url: String::new(),
            cache_url: String::new(),
            pii_encryption_key: String::new(),
            cache_hmac_key: String::new(),
            jwt_signing_key: String::new(),
            jwt_algorithm: jwt_algorithm.to_string(),
            jwt_ttl_seconds: default_jwt_ttl_seconds(),
            allowed_hosts: String::new(),
            ip_allow_list: String::new(),
            environment: default_environment(),
            bind_addr: default_bind_addr(),
            l1_cache_capacity: default_l1_capacity(),
        }
    }

    #[test]
    fn jwt_algorithm_maps_known_names() {
        assert_eq!(cfg_with_algorithm("HS384").jwt_algorithm(), jsonwebtoken::Algorithm::HS384);
        assert_eq!(cfg_with_algorithm("HS512").jwt_algorithm(), jsonwebtoken::Algorithm::HS512);
    }

    #[test]
    fn jwt_algorithm_defaults_to_hs256_for_unknown_name() {
        assert_eq!(cfg_with_algorithm("nonsense").jwt_algorithm(), jsonwebtoken::Algorithm::HS256);
    }

    #[test]
    fn defaults_match_expected_values() {
        assert_eq!(default_jwt_algorithm(), "HS256");
        assert_eq!(default_jwt_ttl_seconds(), 3600);
        assert_eq!(default_bind_addr(), "0.0.0.0:8080");
        assert_eq!(default_l1_capacity(), 10_000);
    }
}
