use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::LockfileError;
use crate::parse::{is_name_char, is_value_char, parse_complete, parse_constraint};

/// A record that writes itself as the fields of a JSON object.
///
/// The implementor only contributes entries; opening and closing the object
/// belongs to whoever is writing it (see [`FieldObject`]). That lets a caller
/// embed any constraint shape in an array without knowing what it contains.
pub trait WriteFields {
  fn write_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error>;
}

/// Serializes a [`WriteFields`] value as a complete JSON object.
pub struct FieldObject<'a, T>(pub &'a T);

impl<T: WriteFields> Serialize for FieldObject<'_, T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    self.0.write_fields(&mut map)?;
    map.end()
  }
}

/// Restricts which variants of an identity are acceptable, e.g. `version=1.0,1.1`
/// accepts variants whose `version` attribute is one of the listed values.
///
/// Evaluating a constraint is the resolver's job; here it is only carried.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "RawConstraint")]
pub struct Constraint {
  name: String,
  values: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawConstraint {
  name: String,
  values: Vec<String>,
}

impl Constraint {
  pub fn new<I, V>(name: impl Into<String>, values: I) -> Result<Self, LockfileError>
  where
    I: IntoIterator<Item = V>,
    V: Into<String>,
  {
    let name = name.into();
    let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();

    let name_ok = !name.is_empty() && name.chars().all(is_name_char);
    let values_ok = !values.is_empty()
      && values
        .iter()
        .all(|value| !value.is_empty() && value.chars().all(is_value_char));
    if !name_ok || !values_ok {
      return Err(LockfileError::InvalidConstraint(display(&name, &values)));
    }

    Ok(Self { name, values })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// The accepted values, ascending
  pub fn values(&self) -> impl Iterator<Item = &str> {
    self.values.iter().map(String::as_str)
  }
}

impl WriteFields for Constraint {
  fn write_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
    map.serialize_entry("name", &self.name)?;
    map.serialize_entry("values", &self.values)
  }
}

impl Serialize for Constraint {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    FieldObject(self).serialize(serializer)
  }
}

impl TryFrom<RawConstraint> for Constraint {
  type Error = LockfileError;

  fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
    Self::new(raw.name, raw.values)
  }
}

fn display<'a>(name: &str, values: impl IntoIterator<Item = &'a String>) -> String {
  let values: Vec<&str> = values.into_iter().map(String::as_str).collect();
  format!("{name}={}", values.join(","))
}

impl fmt::Display for Constraint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&display(&self.name, &self.values))
  }
}

impl FromStr for Constraint {
  type Err = LockfileError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (name, values) = parse_complete(parse_constraint, s)
      .ok_or_else(|| LockfileError::InvalidConstraint(s.to_string()))?;
    Self::new(name, values)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_constraint_values_are_sorted_and_deduplicated() {
    let constraint = Constraint::new("version", ["1.1", "1.0", "1.1"]).unwrap();
    assert_eq!(constraint.values().collect::<Vec<_>>(), vec!["1.0", "1.1"]);
    assert_eq!(constraint.to_string(), "version=1.0,1.1");
  }

  #[test]
  fn test_constraint_writes_name_then_values() {
    let constraint: Constraint = "version=1.1,1.0".parse().unwrap();
    assert_eq!(
      serde_json::to_string(&constraint).unwrap(),
      r#"{"name":"version","values":["1.0","1.1"]}"#
    );
  }

  #[test]
  fn test_constraint_reads_back() {
    let constraint: Constraint =
      serde_json::from_str(r#"{"name":"version","values":["1.1","1.0"]}"#).unwrap();
    assert_eq!(constraint, Constraint::new("version", ["1.0", "1.1"]).unwrap());
  }

  #[test]
  fn test_constraint_rejects_empty_values() {
    assert!(matches!(
      Constraint::new("version", Vec::<String>::new()),
      Err(LockfileError::InvalidConstraint(_))
    ));
    assert!(serde_json::from_str::<Constraint>(r#"{"name":"version","values":[]}"#).is_err());
  }

  #[test]
  fn test_constraint_rejects_bad_name() {
    assert!(Constraint::new("bad name", ["1.0"]).is_err());
    assert!("=1.0".parse::<Constraint>().is_err());
  }

  /// A second constraint shape, to check that the object framing is owned by
  /// `FieldObject` and not by the implementor.
  struct Range {
    min: &'static str,
    max: &'static str,
  }

  impl WriteFields for Range {
    fn write_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
      map.serialize_entry("type", "range")?;
      map.serialize_entry("min", self.min)?;
      map.serialize_entry("max", self.max)
    }
  }

  #[test]
  fn test_field_object_frames_any_shape() {
    let range = Range {
      min: "1.0",
      max: "2.0",
    };
    assert_eq!(
      serde_json::to_string(&[FieldObject(&range)]).unwrap(),
      r#"[{"type":"range","min":"1.0","max":"2.0"}]"#
    );
  }
}
