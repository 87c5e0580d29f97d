use anyhow::Result;
use instances::dataset::{solomon, Dataset};
use instances::dataset::vrptw::VrptwInstance;

mod espprc;
pub use self::espprc::*;

pub fn get_solomon_instance_by_name(name : &str) -> Result<VrptwInstance> {
  solomon::DSET.load_instance_by_name(name)
}


pub fn get_solomon_instance_by_index(idx : usize) -> Result<VrptwInstance> {
    solomon::DSET.load_instance(idx)
}
