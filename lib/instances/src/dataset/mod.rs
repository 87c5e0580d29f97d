use std::borrow::Cow;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::{Error, Map};

/// Instances of a dataset are addressed either by position or by name.
pub trait IdxNameMap {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>>;

  fn name_to_index(&self, name: &str) -> Result<usize>;

  fn len(&self) -> usize;

  fn check_idx(&self, idx: usize) -> Result<()> {
    if idx < self.len() { Ok(()) } else { Err(Error::IndexOutOfRange.into()) }
  }
}

pub trait Dataset: IdxNameMap + Sync {
  type Instance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance>;

  fn load_instance_by_name(&self, name: &str) -> Result<Self::Instance> {
    self.load_instance(self.name_to_index(name)?)
  }
}

/// Every file under a directory matching a glob pattern, sorted by path.  An instance is named
/// after its file stem.  `F` tags the file format.
pub struct GlobLayout<F> {
  entries: Vec<(String, PathBuf)>,
  by_name: Map<String, usize>,
  _format: PhantomData<F>,
}

impl<F> GlobLayout<F> {
  /// Layout of `$DATA_ROOT/subdir`.
  fn under_data_root(subdir: &str, pattern: &str) -> Result<Self> {
    let root = std::env::var_os("DATA_ROOT").context("environment variable DATA_ROOT must be defined")?;
    Self::from_dir(Path::new(&root).join(subdir), pattern)
  }

  pub fn from_dir(dir: impl AsRef<Path>, pattern: &str) -> Result<Self> {
    let full_pattern = dir.as_ref().join(pattern);
    let full_pattern = full_pattern.to_str()
      .ok_or_else(|| anyhow::anyhow!("non-UTF8 dataset path: {:?}", full_pattern))?;

    let mut entries = Vec::new();
    for path in glob::glob(full_pattern)? {
      let path = path?;
      let stem = path.file_stem()
        .ok_or_else(|| anyhow::anyhow!("missing file stem: {:?}", path))?
        .to_string_lossy()
        .into_owned();
      entries.push((stem, path));
    }
    entries.sort_by(|a, b| a.1.cmp(&b.1));

    let by_name = entries.iter().enumerate().map(|(k, (name, _))| (name.clone(), k)).collect();
    Ok(GlobLayout { entries, by_name, _format: PhantomData })
  }

  fn path(&self, idx: usize) -> Result<&Path> {
    self.check_idx(idx)?;
    Ok(&self.entries[idx].1)
  }
}

impl<F> IdxNameMap for GlobLayout<F> {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.check_idx(idx)?;
    Ok(Cow::Borrowed(&self.entries[idx].0))
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.by_name.get(name).copied().ok_or_else(|| Error::UnknownInstanceName.into())
  }

  fn len(&self) -> usize { self.entries.len() }
}


pub mod solomon;
pub mod vrptw;
