use super::*;
use super::vrptw::VrptwInstance;
use crate::parsers::{ParseInstance, SolomonFmt};
use crate::raw::{FromRaw, solomon::Solomon};
use lazy_static::lazy_static;

pub enum SolomonTxt {}

impl Dataset for GlobLayout<SolomonTxt> {
  type Instance = VrptwInstance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    let instance = self.index_to_name(idx)?;
    let path = self.path(idx)?;
    let raw = Solomon::parse(SolomonFmt(path)).context(format!("failed to load {:?}", path))?;
    VrptwInstance::from_raw(raw, instance).context(format!("invalid instance {:?}", path))
  }
}

lazy_static!{
    /// The Solomon benchmark, one `*.txt` file per instance under `$DATA_ROOT/solomon`.
    pub static ref DSET: GlobLayout<SolomonTxt> = {
        GlobLayout::under_data_root("solomon", "*.txt").unwrap_or_else(|e| panic!("{:?}", e))
    };
}
