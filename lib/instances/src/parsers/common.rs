use super::nom_prelude::*;
use std::str::FromStr;

pub fn usize_<'a, E>(input: &'a str) -> IResult<&'a str, usize, E>
  where
    E: ParseError<&'a str> + error::FromExternalError<&'a str, ParseIntError>
{
  map_res(digit1, usize::from_str)(input)
}

/// Skips a header line starting with `t`, including any leading blank lines.
pub fn header_line<'a, E>(t: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str, E>
  where
    E: ParseError<&'a str>
{
  preceded(multispace0, preceded(tag(t), not_line_ending))
}
