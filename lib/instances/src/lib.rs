pub use anyhow::Result;

use fnv::FnvHashMap as Map;

/// Lookup failures shared by every dataset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Error {
    UnknownInstanceName,
    IndexOutOfRange,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Error::UnknownInstanceName => "no instance with this name",
            Error::IndexOutOfRange => "instance index out of range",
        })
    }
}

impl std::error::Error for Error {}

pub mod parsers;
pub mod raw;
pub mod dataset;
