use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::context::Context;
use crate::error::{LockfileError, Result};
use crate::hash::VariantHash;
use crate::ident::Id;
use crate::requirement::Requirement;

/// The only format version this crate reads and writes
pub const LOCKFILE_VERSION: u32 = 1;

/// How the JSON is laid out. The content and field order are the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
  /// Everything on one line
  Compact,
  /// Two space indentation, one array element per line
  #[default]
  Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
  pub format: Format,
  /// End the document with `\n`, as most editors and diff tools expect
  pub trailing_newline: bool,
}

impl Default for WriteOptions {
  fn default() -> Self {
    Self {
      format: Format::Pretty,
      trailing_newline: true,
    }
  }
}

impl WriteOptions {
  pub fn compact() -> Self {
    Self {
      format: Format::Compact,
      trailing_newline: false,
    }
  }
}

/// A persisted resolution: every requirement that was declared and every
/// context the resolver bound them to.
///
/// Both collections are ordered sets. Inserting the same record twice keeps
/// one copy and the written order never depends on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLockfile")]
pub struct Lockfile {
  version: u32,
  #[serde(default)]
  requirements: BTreeSet<Requirement>,
  #[serde(default)]
  contexts: BTreeSet<Context>,
}

#[derive(Deserialize)]
struct RawLockfile {
  version: u32,
  #[serde(default)]
  requirements: BTreeSet<Requirement>,
  #[serde(default)]
  contexts: BTreeSet<Context>,
}

impl TryFrom<RawLockfile> for Lockfile {
  type Error = LockfileError;

  fn try_from(raw: RawLockfile) -> Result<Self> {
    check_version(raw.version)?;
    Ok(Self {
      version: raw.version,
      requirements: raw.requirements,
      contexts: raw.contexts,
    })
  }
}

/// Just the version, read ahead of the records
#[derive(Deserialize)]
struct VersionHeader {
  version: u32,
}

fn check_version(version: u32) -> Result<()> {
  if version == LOCKFILE_VERSION {
    Ok(())
  } else {
    Err(LockfileError::UnsupportedVersion {
      found: version,
      expected: LOCKFILE_VERSION,
    })
  }
}

impl Default for Lockfile {
  fn default() -> Self {
    Self::new()
  }
}

impl Lockfile {
  pub fn new() -> Self {
    Self {
      version: LOCKFILE_VERSION,
      requirements: BTreeSet::new(),
      contexts: BTreeSet::new(),
    }
  }

  pub fn version(&self) -> u32 {
    self.version
  }

  /// Returns `false` if an identical requirement was already present
  pub fn insert_requirement(&mut self, requirement: Requirement) -> bool {
    self.requirements.insert(requirement)
  }

  /// Returns `false` if an identical context was already present
  pub fn insert_context(&mut self, context: Context) -> bool {
    self.contexts.insert(context)
  }

  #[must_use]
  pub fn with_requirement(mut self, requirement: Requirement) -> Self {
    self.requirements.insert(requirement);
    self
  }

  #[must_use]
  pub fn with_context(mut self, context: Context) -> Self {
    self.contexts.insert(context);
    self
  }

  pub fn requirements(&self) -> impl ExactSizeIterator<Item = &Requirement> {
    self.requirements.iter()
  }

  pub fn contexts(&self) -> impl ExactSizeIterator<Item = &Context> {
    self.contexts.iter()
  }

  pub fn requirements_for<'a>(&'a self, id: &'a Id) -> impl Iterator<Item = &'a Requirement> {
    self
      .requirements
      .iter()
      .filter(move |requirement| requirement.id() == id)
  }

  pub fn contexts_for<'a>(&'a self, id: &'a Id) -> impl Iterator<Item = &'a Context> {
    self
      .contexts
      .iter()
      .filter(move |context| context.id() == id)
  }

  /// The first context (in canonical order) that binds `id` to exactly `hash`
  pub fn context(&self, id: &Id, hash: &VariantHash) -> Option<&Context> {
    self
      .contexts
      .iter()
      .find(|context| context.id() == id && context.hash() == hash)
  }

  /// Contexts that were resolved but have nowhere to be fetched from
  pub fn unfetchable_contexts(&self) -> impl Iterator<Item = &Context> {
    self.contexts.iter().filter(|context| !context.is_fetchable())
  }

  pub fn is_empty(&self) -> bool {
    self.requirements.is_empty() && self.contexts.is_empty()
  }

  pub fn write_json<W: Write>(&self, mut writer: W, options: &WriteOptions) -> Result<()> {
    match options.format {
      Format::Compact => serde_json::to_writer(&mut writer, self)?,
      Format::Pretty => serde_json::to_writer_pretty(&mut writer, self)?,
    }
    if options.trailing_newline {
      writer.write_all(b"\n").map_err(LockfileError::Stream)?;
    }
    Ok(())
  }

  pub fn to_json_string(&self, options: &WriteOptions) -> Result<String> {
    let mut json = match options.format {
      Format::Compact => serde_json::to_string(self)?,
      Format::Pretty => serde_json::to_string_pretty(self)?,
    };
    if options.trailing_newline {
      json.push('\n');
    }
    Ok(json)
  }

  pub fn from_json_str(input: &str) -> Result<Self> {
    let VersionHeader { version } = serde_json::from_str(input)?;
    check_version(version)?;
    Ok(serde_json::from_str(input)?)
  }

  pub fn read_json<R: Read>(mut reader: R) -> Result<Self> {
    let mut input = String::new();
    reader
      .read_to_string(&mut input)
      .map_err(LockfileError::Stream)?;
    Self::from_json_str(&input)
  }

  pub fn read_from_path(path: &Path) -> Result<Self> {
    let input = fs::read_to_string(path).map_err(|source| LockfileError::io(path, source))?;
    let lockfile = Self::from_json_str(&input)?;
    tracing::debug!(
      path = %path.display(),
      requirements = lockfile.requirements.len(),
      contexts = lockfile.contexts.len(),
      "Read lockfile."
    );
    Ok(lockfile)
  }

  /// Write the lockfile to `path`, replacing whatever is there.
  ///
  /// The document goes to a temporary file next to `path` first and is only
  /// renamed over `path` once it has been written and synced completely. If
  /// anything fails the previous file is left as it was.
  pub fn write_to_path(&self, path: &Path, options: &WriteOptions) -> Result<()> {
    for context in self.unfetchable_contexts() {
      tracing::warn!(id = %context.id(), hash = %context.hash(), "Context has no locations.");
    }

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| LockfileError::io(dir, source))?;
    let temp_path = temp.path().to_path_buf();

    {
      let mut writer = BufWriter::new(&mut temp);
      self.write_json(&mut writer, options)?;
      writer
        .flush()
        .map_err(|source| LockfileError::io(&temp_path, source))?;
    }
    temp
      .as_file()
      .sync_all()
      .map_err(|source| LockfileError::io(&temp_path, source))?;
    temp
      .persist(path)
      .map_err(|error| LockfileError::io(path, error.error))?;

    tracing::debug!(
      path = %path.display(),
      requirements = self.requirements.len(),
      contexts = self.contexts.len(),
      "Wrote lockfile."
    );
    Ok(())
  }
}
