//! Composite keys
//!
//! Layout: `U+0000 <index> U+0000 (<part> U+0000)*`
//!
//! The leading NUL puts every composite key before all plain record keys
//! and keeps the two namespaces apart. Each part is terminated by NUL, so a
//! key built from a prefix of the parts is a byte prefix of the full key
//! and a prefix scan over `[userId]` never matches `[userId2]`.

use super::{LedgerError, LedgerResult};

const SEPARATOR: char = '\u{0000}';
const MAX_UNICODE_RUNE: char = char::MAX;

/// Build the composite key for `index` over `parts`
///
/// Also used with a leading subset of the parts to build a scan prefix.
pub fn composite_key<S: AsRef<str>>(index: &str, parts: &[S]) -> LedgerResult<String> {
    validate_part(index)?;
    let mut key = String::with_capacity(
        2 + index.len() + parts.iter().map(|p| p.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(SEPARATOR);
    key.push_str(index);
    key.push(SEPARATOR);
    for part in parts {
        let part = part.as_ref();
        validate_part(part)?;
        key.push_str(part);
        key.push(SEPARATOR);
    }
    Ok(key)
}

fn validate_part(part: &str) -> LedgerResult<()> {
    if part.contains(SEPARATOR) || part.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidKeyPart(part.escape_debug().to_string()));
    }
    Ok(())
}
