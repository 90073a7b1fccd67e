//! Property tests for the serialization contract: output only depends on the
//! logical content of a record, and reading it back changes nothing.

use lockfile_core::{
  Commit, Constraint, Context, Id, Lockfile, RepositoryLocation, RepositoryName, Requirement,
  VariantHash, WriteOptions,
};
use proptest::prelude::*;

fn id_strategy() -> impl Strategy<Value = Id> {
  "[a-z]{1,6}:[a-z0-9.-]{1,8}".prop_map(|value| Id::new(value).unwrap())
}

fn constraint_strategy() -> impl Strategy<Value = Constraint> {
  (
    "[a-z][a-z-]{0,10}",
    prop::collection::vec("[0-9]{1,2}(\\.[0-9]{1,2}){0,2}", 1..4),
  )
    .prop_map(|(name, values)| Constraint::new(name, values).unwrap())
}

fn requirement_strategy() -> impl Strategy<Value = Requirement> {
  (
    id_strategy(),
    prop::collection::vec(constraint_strategy(), 0..4),
    prop::collection::vec(id_strategy(), 0..5),
  )
    .prop_map(|(id, constraints, exclusions)| {
      let exclusions: Vec<Id> = exclusions
        .into_iter()
        .filter(|exclusion| *exclusion != id)
        .collect();
      Requirement::new(id, constraints, exclusions).unwrap()
    })
}

fn context_strategy() -> impl Strategy<Value = Context> {
  (
    "[ -~]{0,20}",
    id_strategy(),
    "[a-z]{1,10}",
    prop::collection::vec("https://[a-z]{1,8}\\.example\\.com/[a-z]{1,8}", 0..3),
    prop::option::of("[0-9a-f]{40}"),
    "[0-9a-f]{64}",
  )
    .prop_map(|(info, id, repository, locations, commit, hash)| {
      Context::new(
        info,
        id,
        RepositoryName::new(repository).unwrap(),
        locations
          .into_iter()
          .map(|location| RepositoryLocation::new(location).unwrap()),
        commit.map(|commit| Commit::new(commit).unwrap()),
        VariantHash::new(hash).unwrap(),
      )
    })
}

proptest! {
  #[test]
  fn requirement_serialization_is_deterministic(requirement in requirement_strategy()) {
    let first = requirement.to_json_string().unwrap();
    let second = requirement.clone().to_json_string().unwrap();
    prop_assert_eq!(first, second);
  }

  #[test]
  fn requirement_round_trip_is_stable(requirement in requirement_strategy()) {
    let json = requirement.to_json_string().unwrap();
    let parsed: Requirement = serde_json::from_str(&json).unwrap();
    prop_assert_eq!(&parsed, &requirement);
    prop_assert_eq!(parsed.to_json_string().unwrap(), json);
  }

  #[test]
  fn requirement_order_of_construction_does_not_matter(requirement in requirement_strategy()) {
    let mut constraints: Vec<Constraint> = requirement.constraints().cloned().collect();
    let mut exclusions: Vec<Id> = requirement.exclusions().cloned().collect();
    constraints.reverse();
    exclusions.reverse();
    let reversed = Requirement::new(requirement.id().clone(), constraints, exclusions).unwrap();
    prop_assert_eq!(reversed.to_json_string().unwrap(), requirement.to_json_string().unwrap());
  }

  #[test]
  fn requirement_exclusions_are_unique(requirement in requirement_strategy()) {
    let value: serde_json::Value = serde_json::from_str(&requirement.to_json_string().unwrap()).unwrap();
    let exclusions: Vec<&str> = value["exclusions"]
      .as_array()
      .unwrap()
      .iter()
      .map(|exclusion| exclusion.as_str().unwrap())
      .collect();
    let mut deduplicated = exclusions.clone();
    deduplicated.sort_unstable();
    deduplicated.dedup();
    prop_assert_eq!(exclusions, deduplicated);
  }

  #[test]
  fn requirement_line_round_trip(requirement in requirement_strategy()) {
    let parsed: Requirement = requirement.to_string().parse().unwrap();
    prop_assert_eq!(parsed, requirement);
  }

  #[test]
  fn lockfile_round_trip_is_stable(
    requirements in prop::collection::vec(requirement_strategy(), 0..6),
    contexts in prop::collection::vec(context_strategy(), 0..6),
  ) {
    let mut lockfile = Lockfile::new();
    for requirement in requirements {
      lockfile.insert_requirement(requirement);
    }
    for context in contexts {
      lockfile.insert_context(context);
    }

    let json = lockfile.to_json_string(&WriteOptions::default()).unwrap();
    let parsed = Lockfile::from_json_str(&json).unwrap();
    prop_assert_eq!(&parsed, &lockfile);
    prop_assert_eq!(parsed.to_json_string(&WriteOptions::default()).unwrap(), json);
  }
}
