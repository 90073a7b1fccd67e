use std::path::PathBuf;

use thiserror::Error;

use crate::ident::Id;

pub type Result<T, E = LockfileError> = std::result::Result<T, E>;

/// Everything that can go wrong while building, reading or writing lockfile records.
#[derive(Debug, Error)]
pub enum LockfileError {
  #[error("invalid identity `{0}`")]
  InvalidId(String),

  #[error("invalid repository name `{0}`")]
  InvalidRepositoryName(String),

  #[error("invalid repository location `{0}`")]
  InvalidLocation(String),

  #[error("invalid commit `{0}`: expected 4 to 64 hex digits")]
  InvalidCommit(String),

  #[error("invalid variant hash `{0}`: expected 64 hex digits")]
  InvalidVariantHash(String),

  #[error("invalid constraint `{0}`: expected `name=value[,value...]`")]
  InvalidConstraint(String),

  #[error("invalid requirement `{0}`")]
  InvalidRequirement(String),

  /// A requirement may not exclude the identity it requires.
  #[error("requirement `{id}` excludes itself")]
  SelfExclusion { id: Id },

  #[error("unsupported lockfile version {found} (expected {expected})")]
  UnsupportedVersion { found: u32, expected: u32 },

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The reader or writer handed to `read_json`/`write_json` failed outside
  /// of JSON encoding.
  #[error("failed to stream lockfile")]
  Stream(#[source] std::io::Error),

  #[error("failed to access lockfile {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl LockfileError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
