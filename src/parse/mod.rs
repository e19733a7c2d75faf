//! Text input for the command-line front end.

pub mod params;

pub use params::{ParseError, ParseResult, parse_params};
