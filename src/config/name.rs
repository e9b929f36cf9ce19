//! Operation names as they appear under `"name"` in the config.
//!
//! Example: "Subtract" => OpName("Subtract")
//!
//! Names double as registry keys, so they are checked once here and stored as
//! plain strings afterwards.

use crate::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted operation name, in bytes.
pub const MAX_NAME_LEN: usize = 256;

const NAME_CHARSET_RE: &str = r"^[A-Za-z0-9_+\-/,;. ]+$";

static NAME_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAME_CHARSET_RE).expect("operation name pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpName(pub String);

impl OpName {
    /// Check length and charset; `index` is the position in `Operations`.
    pub fn parse(raw: &str, index: usize) -> Result<Self, SchemaError> {
        if raw.is_empty() || raw.len() > MAX_NAME_LEN {
            return Err(SchemaError::NameLength {
                index,
                len: raw.len(),
                max: MAX_NAME_LEN,
            });
        }
        if !NAME_CHARSET.is_match(raw) {
            return Err(SchemaError::NameCharset(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_punctuation_from_the_allowed_set() {
        assert!(OpName::parse("Add", 0).is_ok());
        assert!(OpName::parse("my op_1+2-3/4,5;6.7", 0).is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(matches!(
            OpName::parse("", 3),
            Err(SchemaError::NameLength { index: 3, len: 0, .. })
        ));
        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            OpName::parse(&long, 0),
            Err(SchemaError::NameLength { len: 257, .. })
        ));
        assert!(OpName::parse(&"a".repeat(MAX_NAME_LEN), 0).is_ok());
    }

    #[test]
    fn rejects_disallowed_characters() {
        for bad in ["Add!", "a\tb", "x*y", "../$HOME", "名前"] {
            assert!(
                matches!(OpName::parse(bad, 0), Err(SchemaError::NameCharset(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
