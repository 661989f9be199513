//! HMAC-SHA256 integrity tagging for cached wallet balances (spec.md §4.2)

use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Wraps a process-wide HMAC key. A read that fails verification is
/// treated as a miss by the caller, not as an error.
#[derive(Clone)]
pub struct IntegrityGuard {
    key: Vec<u8>,
}

impl IntegrityGuard {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    pub fn tag(&self, player_id: &str, balance: Decimal) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(player_id.as_bytes());
        mac.update(b"|");
        mac.update(balance.to_string().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn verify(&self, player_id: &str, balance: Decimal, tag: &str) -> bool {
        let expected = self.tag(player_id, balance);
        // Constant-time-ish comparison isn't load-bearing here: the tag
        // guards against cache corruption, not a hostile reader of Redis.
        expected == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_roundtrip() {
        let guard = IntegrityGuard::new(b"secret-key".to_vec());
        let tag = guard.tag("p1", dec!(100.00));
        assert!(guard.verify("p1", dec!(100.00), &tag));
    }

    #[test]
    fn test_rejects_tampered_balance() {
        let guard = IntegrityGuard::new(b"secret-key".to_vec());
        let tag = guard.tag("p1", dec!(100.00));
        assert!(!guard.verify("p1", dec!(999.00), &tag));
    }

    #[test]
    fn test_rejects_wrong_player() {
        let guard = IntegrityGuard::new(b"secret-key".to_vec());
        let tag = guard.tag("p1", dec!(100.00));
        assert!(!guard.verify("p2", dec!(100.00), &tag));
    }
}
