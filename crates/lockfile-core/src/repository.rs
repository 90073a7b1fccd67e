use serde::{Deserialize, Serialize};

use crate::error::LockfileError;
use crate::parse::{is_name_char, parse_complete, parse_hex};

/// Name of the repository a resolution was found in, e.g. `central`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName(String);

impl RepositoryName {
  pub fn new(name: impl Into<String>) -> Result<Self, LockfileError> {
    let name = name.into();
    if name.is_empty() || !name.chars().all(is_name_char) {
      return Err(LockfileError::InvalidRepositoryName(name));
    }
    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

string_value!(RepositoryName);

/// A place a repository is mirrored at: a URL or a filesystem path.
/// The location is opaque here; fetching from it is someone else's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryLocation(String);

impl RepositoryLocation {
  pub fn new(location: impl Into<String>) -> Result<Self, LockfileError> {
    let location = location.into();
    if location.is_empty() || location.chars().any(|c| c.is_whitespace() || c.is_control()) {
      return Err(LockfileError::InvalidLocation(location));
    }
    Ok(Self(location))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

string_value!(RepositoryLocation);

/// A version control commit a resolution is pinned to.
///
/// Abbreviated commits are accepted down to 4 digits; the value is stored in
/// lower case so `ABCD` and `abcd` are the same commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commit(String);

impl Commit {
  pub const MIN_LEN: usize = 4;
  pub const MAX_LEN: usize = 64;

  pub fn new(commit: impl Into<String>) -> Result<Self, LockfileError> {
    let commit = commit.into();
    match parse_complete(parse_hex, &commit) {
      Some(hex) if (Self::MIN_LEN..=Self::MAX_LEN).contains(&hex.len()) => {
        Ok(Self(hex.to_ascii_lowercase()))
      }
      _ => Err(LockfileError::InvalidCommit(commit)),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

string_value!(Commit);

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[rstest]
  #[case("central", true)]
  #[case("my-repo_2.x", true)]
  #[case("", false)]
  #[case("has space", false)]
  #[case("slash/name", false)]
  fn test_repository_name(#[case] input: &str, #[case] valid: bool) {
    assert_eq!(RepositoryName::new(input).is_ok(), valid);
  }

  #[rstest]
  #[case("https://repo.example.com/central", true)]
  #[case("/srv/mirrors/central", true)]
  #[case("", false)]
  #[case("https://repo.example.com/a b", false)]
  fn test_repository_location(#[case] input: &str, #[case] valid: bool) {
    assert_eq!(RepositoryLocation::new(input).is_ok(), valid);
  }

  #[test]
  fn test_commit_is_lowercased() {
    let commit = Commit::new("ABCDEF0123").unwrap();
    assert_eq!(commit.as_str(), "abcdef0123");
    assert_eq!(commit, Commit::new("abcdef0123").unwrap());
  }

  #[rstest]
  #[case("abc")]
  #[case("not-hex")]
  #[case("")]
  fn test_commit_rejects(#[case] input: &str) {
    assert!(matches!(
      Commit::new(input),
      Err(LockfileError::InvalidCommit(_))
    ));
  }

  #[test]
  fn test_commit_rejects_too_long() {
    assert!(Commit::new("a".repeat(Commit::MAX_LEN + 1)).is_err());
    assert!(Commit::new("a".repeat(Commit::MAX_LEN)).is_ok());
  }
}
