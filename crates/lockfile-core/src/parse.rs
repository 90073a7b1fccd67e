//! nom parsers for the textual forms of lockfile values.
//!
//! Every value type validates through these parsers, whether it is built from
//! a `&str`, read back from JSON, or parsed out of the one-line requirement
//! notation:
//!
//! ```text
//! lib:core version=1.0,1.1 !lib:legacy
//! ```

use nom::{
  IResult, Parser,
  branch::alt,
  bytes::complete::take_while1,
  character::complete::{char, space0, space1},
  combinator::{all_consuming, map, verify},
  multi::{many0, separated_list1},
  sequence::{preceded, separated_pair, terminated},
};

/// Characters allowed in an identity.
/// The excluded punctuation is what the requirement notation and JSON use as delimiters.
pub(crate) fn is_id_char(c: char) -> bool {
  !c.is_whitespace() && !c.is_control() && !matches!(c, '=' | ',' | '"' | '[' | ']')
}

/// Characters allowed in repository and constraint names
pub(crate) fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

pub(crate) fn is_value_char(c: char) -> bool {
  !c.is_whitespace() && !c.is_control() && c != ','
}

/// Parse an identity, e.g. `lib:core` or `com.example/config/2.11`
pub fn parse_id(input: &str) -> IResult<&str, &str> {
  verify(take_while1(is_id_char), |id: &str| !id.starts_with('!')).parse(input)
}

/// Parse a repository or constraint name, e.g. `central` or `binary-version`
pub fn parse_name(input: &str) -> IResult<&str, &str> {
  take_while1(is_name_char).parse(input)
}

/// Parse a run of hex digits, as used by commits and variant hashes
pub fn parse_hex(input: &str) -> IResult<&str, &str> {
  take_while1(|c: char| c.is_ascii_hexdigit()).parse(input)
}

/// Parse a constraint in `name=value[,value...]` form
pub fn parse_constraint(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
  separated_pair(
    parse_name,
    char('='),
    separated_list1(char(','), take_while1(is_value_char)),
  )
  .parse(input)
}

/// The raw pieces of a one-line requirement, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementParts<'a> {
  pub id: &'a str,
  pub constraints: Vec<(&'a str, Vec<&'a str>)>,
  pub exclusions: Vec<&'a str>,
}

enum Token<'a> {
  Constraint((&'a str, Vec<&'a str>)),
  Exclusion(&'a str),
}

fn parse_token(input: &str) -> IResult<&str, Token<'_>> {
  alt((
    map(parse_constraint, Token::Constraint),
    map(preceded(char('!'), parse_id), Token::Exclusion),
  ))
  .parse(input)
}

/// Parse a requirement line: the identity followed by space separated
/// constraints (`name=values`) and exclusions (`!id`) in any order.
pub fn parse_requirement_line(input: &str) -> IResult<&str, RequirementParts<'_>> {
  let (rest, (id, tokens)) = (
    preceded(space0, parse_id),
    terminated(many0(preceded(space1, parse_token)), space0),
  )
    .parse(input)?;

  let mut constraints = Vec::new();
  let mut exclusions = Vec::new();
  for token in tokens {
    match token {
      Token::Constraint(constraint) => constraints.push(constraint),
      Token::Exclusion(exclusion) => exclusions.push(exclusion),
    }
  }

  Ok((
    rest,
    RequirementParts {
      id,
      constraints,
      exclusions,
    },
  ))
}

/// Run `parser` over the whole of `input`, discarding the nom error detail.
/// Callers turn `None` into the error variant for the value they are building.
pub(crate) fn parse_complete<'a, O, P>(parser: P, input: &'a str) -> Option<O>
where
  P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
  all_consuming(parser).parse(input).ok().map(|(_, output)| output)
}
