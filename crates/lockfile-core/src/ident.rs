use serde::{Deserialize, Serialize};

use crate::error::LockfileError;
use crate::parse::{parse_complete, parse_id};

/// Opaque identity of an artifact, e.g. `lib:core`.
///
/// Identities compare and order by their string form, which is also the order
/// they are written in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(String);

impl Id {
  pub fn new(value: impl Into<String>) -> Result<Self, LockfileError> {
    let value = value.into();
    if parse_complete(parse_id, &value).is_none() {
      return Err(LockfileError::InvalidId(value));
    }
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

string_value!(Id);
