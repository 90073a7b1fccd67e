use serde::{Deserialize, Serialize};

use crate::error::LockfileError;
use crate::parse::{parse_complete, parse_hex};

/// Content hash of the exact variant a resolution settled on.
///
/// This is what makes a lockfile reproducible: two contexts with the same
/// identity and hash are interchangeable. Stored as 64 lower case hex digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantHash(String);

impl VariantHash {
  pub const LEN: usize = 64;

  pub fn new(hash: impl Into<String>) -> Result<Self, LockfileError> {
    let hash = hash.into();
    match parse_complete(parse_hex, &hash) {
      Some(hex) if hex.len() == Self::LEN => Ok(Self(hex.to_ascii_lowercase())),
      _ => Err(LockfileError::InvalidVariantHash(hash)),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

string_value!(VariantHash);

#[cfg(test)]
mod tests {
  use super::*;

  const HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

  #[test]
  fn test_variant_hash_accepts_sha256_hex() {
    let hash = VariantHash::new(HASH).unwrap();
    assert_eq!(hash.as_str(), HASH);
    assert_eq!(VariantHash::new(HASH.to_uppercase()).unwrap(), hash);
  }

  #[test]
  fn test_variant_hash_rejects_wrong_length() {
    assert!(VariantHash::new(&HASH[..63]).is_err());
    assert!(VariantHash::new(format!("{HASH}0")).is_err());
  }

  #[test]
  fn test_variant_hash_rejects_non_hex() {
    let bad = HASH.replacen('9', "g", 1);
    assert!(matches!(
      VariantHash::new(bad),
      Err(LockfileError::InvalidVariantHash(_))
    ));
  }
}
