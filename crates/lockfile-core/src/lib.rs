//! # Lockfile core
//!
//! Records for a dependency lockfile: what a project asked for
//! ([`Requirement`]) and what the resolver settled on ([`Context`]), plus the
//! canonical JSON they are persisted as.
//!
//! Resolution itself, fetching artifacts and talking to repositories all live
//! elsewhere. This crate only models and serializes the results.
#![deny(clippy::all)]

/// `Display`, `FromStr`, `TryFrom<String>`, `Into<String>` and `AsRef<str>` for
/// a validated string newtype with `new` and `as_str`.
macro_rules! string_value {
  ($name:ident) => {
    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl std::str::FromStr for $name {
      type Err = $crate::error::LockfileError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
      }
    }

    impl TryFrom<String> for $name {
      type Error = $crate::error::LockfileError;

      fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
      }
    }

    impl From<$name> for String {
      fn from(value: $name) -> Self {
        value.0
      }
    }

    impl AsRef<str> for $name {
      fn as_ref(&self) -> &str {
        self.as_str()
      }
    }
  };
}

pub mod constraint;
pub mod context;
pub mod error;
pub mod hash;
pub mod ident;
pub mod lockfile;
pub mod parse;
pub mod repository;
pub mod requirement;

pub use constraint::{Constraint, FieldObject, WriteFields};
pub use context::Context;
pub use error::{LockfileError, Result};
pub use hash::VariantHash;
pub use ident::Id;
pub use lockfile::{Format, LOCKFILE_VERSION, Lockfile, WriteOptions};
pub use repository::{Commit, RepositoryLocation, RepositoryName};
pub use requirement::Requirement;
