//! Low-level nom parser functions for property value strings.
//!
//! Lengths come out in millipoints. Border shorthands follow the
//! `"<width> <style> <color>"` form, e.g. `"1pt solid #000000"`.

use crate::border::{Border, BorderStyle};
use crate::margins::Margins;
use folio_types::{Color, Length};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::{char, digit1, one_of, space0, space1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during property value parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

type ParseErr<'a> = nom::error::Error<&'a str>;

// --- Helper Parsers ---

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = ParseErr<'a>>
where
    F: Parser<&'a str, Output = O, Error = ParseErr<'a>>,
{
    delimited(space0, inner, space0)
}

fn parse_f64(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            opt(one_of("+-")),
            alt((
                recognize((digit1, opt((char('.'), digit1)))),
                recognize((char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

// --- Units & Lengths ---

/// Millipoints per unit.
fn parse_unit(input: &str) -> IResult<&str, f64> {
    alt((
        map(tag_no_case("mpt"), |_| 1.0),
        map(tag_no_case("pt"), |_| 1000.0),
        map(tag_no_case("px"), |_| 1000.0),
        map(tag_no_case("pc"), |_| 12_000.0),
        map(tag_no_case("in"), |_| 72_000.0),
        map(tag_no_case("cm"), |_| 72_000.0 / 2.54),
        map(tag_no_case("mm"), |_| 7_200.0 / 2.54),
    ))
    .parse(input)
}

/// Parses a length with an optional unit into millipoints. A bare number is
/// read as points.
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    let (input, value) = parse_f64(input)?;
    let (input, unit) = opt(parse_unit).parse(input)?;
    Ok((input, (value * unit.unwrap_or(1000.0)).round() as Length))
}

// --- Color & Border Parsers ---

fn hex_digits(input: &str) -> IResult<&str, &str> {
    alt((
        take_while_m_n(6, 6, |c: char| c.is_ascii_hexdigit()),
        take_while_m_n(3, 3, |c: char| c.is_ascii_hexdigit()),
    ))
    .parse(input)
}

/// Parses a hex color (`#FF0000` or `#F00`).
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    map_res(recognize(preceded(char('#'), hex_digits)), Color::from_hex).parse(input)
}

/// Parses a border style keyword.
pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        map(tag_no_case("solid"), |_| BorderStyle::Solid),
        map(tag_no_case("dashed"), |_| BorderStyle::Dashed),
        map(tag_no_case("dotted"), |_| BorderStyle::Dotted),
        map(tag_no_case("double"), |_| BorderStyle::Double),
        map(tag_no_case("none"), |_| BorderStyle::None),
    ))
    .parse(input)
}

/// Parses a border shorthand (e.g. `"2pt solid #00ff00"`). The color may be
/// omitted and defaults to black.
pub fn parse_border(input: &str) -> IResult<&str, Border> {
    map(
        (ws(parse_length), ws(parse_border_style), opt(ws(parse_color))),
        |(width, style, color)| Border {
            width,
            style,
            color: color.unwrap_or(Color::BLACK),
        },
    )
    .parse(input)
}

/// Runs a nom parser over the whole (trimmed) input.
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = ParseErr<'a>>,
{
    match parser.parse(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

/// Parses a 1, 2 or 4 value margin shorthand.
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let values = run_parser(separated_list1(space1, parse_length), input)?;
    Margins::from_values(&values)
}

/// Parses a full length value string such as `"12pt"`.
pub fn length_from_str(s: &str) -> Result<Length, StyleParseError> {
    run_parser(parse_length, s).map_err(|_| StyleParseError::InvalidValue {
        property: "length".to_string(),
        value: s.to_string(),
    })
}
