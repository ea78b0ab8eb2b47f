use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};

/// Current UTC instant
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Build a UTC instant from Unix seconds (out-of-range values clamp to the epoch)
pub fn from_unix(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// SHA-256 over a list of fields, each followed by a NUL separator.
///
/// The separator keeps `["ab", "c"]` and `["a", "bc"]` apart.
pub fn fingerprint(fields: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        hasher.update(field);
        hasher.update(b"\x00");
    }
    hex::encode(hasher.finalize())
}

/// SHA-256 hex digest of an arbitrary byte payload
pub fn sha256_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_separates_fields() {
        let a = fingerprint(&[b"ab", b"c"]);
        let b = fingerprint(&[b"a", b"bc"]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_from_unix() {
        assert_eq!(from_unix(0), DateTime::UNIX_EPOCH);
        assert_eq!(from_unix(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
