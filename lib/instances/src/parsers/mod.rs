mod solomon;
pub use solomon::{SolomonFmt, SolomonText};


mod nom_prelude {
  pub use nom::{
    IResult,
    error::{
      self,
      ParseError,
      FromExternalError,
    },
    sequence::*,
    multi::*,
    combinator::*,
    character::complete::*,
    bytes::complete::tag,
    number::complete::double,
    Finish,
  };
  pub use std::num::ParseIntError;
}

mod common;

pub trait ParseInstance<Fmt>: Sized {
  fn parse(inputs: Fmt) -> crate::Result<Self>;
}

#[cfg(test)]
pub(crate) use solomon::tests::C101_5;
