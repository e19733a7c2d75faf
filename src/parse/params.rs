//! Reads radius, width and resolution from plain text.

use thiserror::Error;

use crate::geom::{MobiusError, MobiusParams};

/// Result type for parameter parsing.
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The token is not a number of the expected kind.
    #[error("{name}: expected {expected}, got `{text}`")]
    MalformedInput {
        name: &'static str,
        expected: &'static str,
        text: String,
    },
    /// The input ended before this value.
    #[error("missing value for {name}")]
    MissingInput { name: &'static str },
    /// The numbers parsed but do not describe a valid strip.
    #[error(transparent)]
    Geometry(#[from] MobiusError),
}

/// Parses `R w n` from whitespace-separated text, one per line or all on one.
///
/// `R` and `w` accept any `f64` literal; `n` must be an integer. Tokens after
/// the third are ignored.
pub fn parse_params(input: &str) -> ParseResult<MobiusParams> {
    let mut tokens = input.split_whitespace();

    let radius = parse_real(tokens.next(), "radius")?;
    let width = parse_real(tokens.next(), "width")?;
    let resolution = parse_integer(tokens.next(), "resolution")?;

    let extra = tokens.count();
    if extra > 0 {
        log::debug!("ignoring {extra} trailing input token(s)");
    }

    Ok(MobiusParams::new(radius, width, resolution)?)
}

fn parse_real(token: Option<&str>, name: &'static str) -> ParseResult<f64> {
    let text = token.ok_or(ParseError::MissingInput { name })?;
    text.parse::<f64>().map_err(|_| ParseError::MalformedInput {
        name,
        expected: "a number",
        text: text.to_owned(),
    })
}

fn parse_integer(token: Option<&str>, name: &'static str) -> ParseResult<i64> {
    let text = token.ok_or(ParseError::MissingInput { name })?;
    text.parse::<i64>().map_err(|_| ParseError::MalformedInput {
        name,
        expected: "an integer",
        text: text.to_owned(),
    })
}
