use std::str::FromStr;

use chumsky::{prelude::*, Parser};

use crate::MineLibParseError;

/// Parse a floating point token, accepting the usual spellings of infinity.
pub fn parse_float_token(text: &str) -> Result<f64, MineLibParseError> {
    let token = text.trim();

    match token.to_ascii_lowercase().as_str() {
        "infinity" | "inf" | "+infinity" | "+inf" => Ok(f64::INFINITY),
        "-infinity" | "-inf" => Ok(f64::NEG_INFINITY),
        _ => token
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .ok_or_else(|| MineLibParseError::InvalidNumber(token.to_owned())),
    }
}

/// Parse an integer token such as a block id or a record count.
pub fn parse_integer_token<T: FromStr>(text: &str) -> Result<T, MineLibParseError> {
    let token = text.trim();

    token
        .parse::<T>()
        .map_err(|_| MineLibParseError::InvalidInteger(token.to_owned()))
}

pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('%')
}

/// Split a `KEY: value` header line on its first colon.
///
/// The key is uppercased and its inner spaces become underscores, so
/// `Discount Rate: 0.1` yields `("DISCOUNT_RATE", "0.1")`. Lines without a
/// colon yield `None`.
pub fn split_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = header_parser().parse(line).ok()?;

    Some((
        key.trim().to_uppercase().replace(' ', "_"),
        value.trim().to_owned(),
    ))
}

pub(crate) fn header_parser() -> impl Parser<char, (String, String), Error = Simple<char>> {
    let key = filter(|c: &char| *c != ':')
        .repeated()
        .collect::<String>()
        .labelled("key");

    let value = any().repeated().collect::<String>().labelled("value");

    key.then_ignore(just(':')).then(value).then_ignore(end())
}
