//! Timestamps for HMAC request signing.
//!
//! The server rejects signatures whose timestamp is too far from its own
//! clock, so the timestamp is part of the signed message.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the `CB-ACCESS-TIMESTAMP` value, in seconds since the UNIX epoch.
pub trait TimestampProvider: Send + Sync {
    fn timestamp(&self) -> u64;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimestamp;

impl TimestampProvider for SystemTimestamp {
    fn timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Always returns the same value. Useful for reproducible signatures.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestamp(pub u64);

impl TimestampProvider for FixedTimestamp {
    fn timestamp(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_timestamp_is_seconds() {
        let ts = SystemTimestamp.timestamp();
        // After 2020-01-01 and well below a millisecond-scale value.
        assert!(ts > 1_577_836_800);
        assert!(ts < 100_000_000_000);
    }

    #[test]
    fn test_fixed_timestamp() {
        assert_eq!(FixedTimestamp(42).timestamp(), 42);
    }
}
