use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::str::FromStr;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::error::{LockfileError, Result};
use crate::ident::Id;
use crate::parse::{parse_complete, parse_requirement_line};

/// A declared need, before resolution: "give me `id`, matching every
/// constraint, and never use any of the excluded identities for it".
///
/// Requirements are immutable. The `with_*` methods hand back a new value.
///
/// Constraints and exclusions are ordered sets, so a requirement always
/// serializes to the same bytes no matter what order it was built in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "RawRequirement")]
pub struct Requirement {
  id: Id,
  constraints: BTreeSet<Constraint>,
  exclusions: BTreeSet<Id>,
}

#[derive(Deserialize)]
struct RawRequirement {
  id: Id,
  #[serde(default)]
  constraints: Vec<Constraint>,
  #[serde(default)]
  exclusions: Vec<Id>,
}

impl Requirement {
  /// Fails with [`LockfileError::SelfExclusion`] if `id` is among the exclusions.
  pub fn new(
    id: Id,
    constraints: impl IntoIterator<Item = Constraint>,
    exclusions: impl IntoIterator<Item = Id>,
  ) -> Result<Self> {
    let exclusions: BTreeSet<Id> = exclusions.into_iter().collect();
    if exclusions.contains(&id) {
      return Err(LockfileError::SelfExclusion { id });
    }

    Ok(Self {
      id,
      constraints: constraints.into_iter().collect(),
      exclusions,
    })
  }

  pub fn id(&self) -> &Id {
    &self.id
  }

  /// Constraints in canonical order
  pub fn constraints(&self) -> impl ExactSizeIterator<Item = &Constraint> {
    self.constraints.iter()
  }

  /// Excluded identities in canonical order
  pub fn exclusions(&self) -> impl ExactSizeIterator<Item = &Id> {
    self.exclusions.iter()
  }

  pub fn excludes(&self, id: &Id) -> bool {
    self.exclusions.contains(id)
  }

  #[must_use]
  pub fn with_constraint(mut self, constraint: Constraint) -> Self {
    self.constraints.insert(constraint);
    self
  }

  pub fn with_exclusion(mut self, exclusion: Id) -> Result<Self> {
    if exclusion == self.id {
      return Err(LockfileError::SelfExclusion { id: exclusion });
    }
    self.exclusions.insert(exclusion);
    Ok(self)
  }

  /// Write this requirement as one JSON object.
  ///
  /// Errors from `writer` are returned as they are; whatever was already
  /// written is not a valid fragment and should be thrown away.
  pub fn write_to<W: io::Write>(&self, writer: W) -> Result<()> {
    serde_json::to_writer(writer, self)?;
    Ok(())
  }

  pub fn to_json_string(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }
}

impl Serialize for Requirement {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Requirement", 3)?;
    state.serialize_field("id", &self.id)?;
    state.serialize_field("constraints", &self.constraints)?;
    state.serialize_field("exclusions", &self.exclusions)?;
    state.end()
  }
}

impl TryFrom<RawRequirement> for Requirement {
  type Error = LockfileError;

  fn try_from(raw: RawRequirement) -> Result<Self> {
    Self::new(raw.id, raw.constraints, raw.exclusions)
  }
}

/// One line, e.g. `lib:core version=1.0,1.1 !lib:legacy`
impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.id)?;
    for constraint in &self.constraints {
      write!(f, " {constraint}")?;
    }
    for exclusion in &self.exclusions {
      write!(f, " !{exclusion}")?;
    }
    Ok(())
  }
}

impl FromStr for Requirement {
  type Err = LockfileError;

  fn from_str(s: &str) -> Result<Self> {
    let parts = parse_complete(parse_requirement_line, s)
      .ok_or_else(|| LockfileError::InvalidRequirement(s.to_string()))?;

    let constraints = parts
      .constraints
      .into_iter()
      .map(|(name, values)| Constraint::new(name, values))
      .collect::<Result<Vec<_>>>()?;
    let exclusions = parts
      .exclusions
      .into_iter()
      .map(Id::new)
      .collect::<Result<Vec<_>>>()?;

    Self::new(Id::new(parts.id)?, constraints, exclusions)
  }
}
