use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hash::VariantHash;
use crate::ident::Id;
use crate::repository::{Commit, RepositoryLocation, RepositoryName};

/// A resolved binding: `id` was satisfied by the variant with `hash`, found in
/// `repository`, fetchable from any of `locations`.
///
/// Written with the fields in declaration order. An absent `commit` is left
/// out of the JSON entirely rather than written as `null`.
///
/// Contexts order by identity, then hash; the remaining fields only break ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
  /// Free-form provenance, e.g. which declaration pulled this in
  info: String,
  id: Id,
  repository: RepositoryName,
  locations: BTreeSet<RepositoryLocation>,
  /// Absent when the repository is not commit addressable
  #[serde(default, skip_serializing_if = "Option::is_none")]
  commit: Option<Commit>,
  hash: VariantHash,
}

impl Context {
  pub fn new(
    info: impl Into<String>,
    id: Id,
    repository: RepositoryName,
    locations: impl IntoIterator<Item = RepositoryLocation>,
    commit: Option<Commit>,
    hash: VariantHash,
  ) -> Self {
    Self {
      info: info.into(),
      id,
      repository,
      locations: locations.into_iter().collect(),
      commit,
      hash,
    }
  }

  pub fn info(&self) -> &str {
    &self.info
  }

  pub fn id(&self) -> &Id {
    &self.id
  }

  pub fn repository(&self) -> &RepositoryName {
    &self.repository
  }

  /// Mirror locations in canonical order
  pub fn locations(&self) -> impl ExactSizeIterator<Item = &RepositoryLocation> {
    self.locations.iter()
  }

  pub fn commit(&self) -> Option<&Commit> {
    self.commit.as_ref()
  }

  pub fn hash(&self) -> &VariantHash {
    &self.hash
  }

  /// A context without locations was resolved but cannot be fetched from anywhere
  pub fn is_fetchable(&self) -> bool {
    !self.locations.is_empty()
  }

  /// Same identity and same variant: either context can stand in for the other,
  /// whatever their provenance or mirrors say.
  pub fn is_interchangeable_with(&self, other: &Self) -> bool {
    self.id == other.id && self.hash == other.hash
  }
}

impl Ord for Context {
  fn cmp(&self, other: &Self) -> Ordering {
    (
      &self.id,
      &self.hash,
      &self.repository,
      &self.commit,
      &self.locations,
      &self.info,
    )
      .cmp(&(
        &other.id,
        &other.hash,
        &other.repository,
        &other.commit,
        &other.locations,
        &other.info,
      ))
  }
}

impl PartialOrd for Context {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}
