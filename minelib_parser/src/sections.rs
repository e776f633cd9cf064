use std::{io::BufRead, str::FromStr};

use log::{debug, trace, warn};

use crate::{
    cursor::LineCursor,
    lexical::{is_comment_or_blank, parse_float_token, parse_integer_token, split_key_value},
    structs::ResourceLimits,
    MineLibParseError,
};

pub(crate) fn require_fields(
    fields: &[&str],
    expected: usize,
    line: usize,
) -> Result<(), MineLibParseError> {
    if fields.len() < expected {
        return Err(MineLibParseError::TooFewFields {
            line,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// One past `id`, the block count implied by a line naming `id`.
pub(crate) fn count_after(id: usize, line: usize) -> Result<usize, MineLibParseError> {
    id.checked_add(1).ok_or(MineLibParseError::Overflow {
        line,
        what: "block count",
    })
}

pub(crate) fn number(token: &str, line: usize) -> Result<f64, MineLibParseError> {
    parse_float_token(token).map_err(|err| err.at_line(line))
}

pub(crate) fn integer<T: FromStr>(token: &str, line: usize) -> Result<T, MineLibParseError> {
    parse_integer_token(token).map_err(|err| err.at_line(line))
}

/// Drive the `KEY: value` loop of a problem file.
///
/// Comment and blank lines are skipped, lines without a colon are ignored.
/// `handle` gets the cursor so it can read the body of a section.
pub(crate) fn for_each_header<R, F>(
    cursor: &mut LineCursor<R>,
    mut handle: F,
) -> Result<(), MineLibParseError>
where
    R: BufRead,
    F: FnMut(&str, &str, &mut LineCursor<R>) -> Result<(), MineLibParseError>,
{
    while let Some(line) = cursor.next_line()? {
        if is_comment_or_blank(&line) {
            continue;
        }

        match split_key_value(&line) {
            Some((key, value)) => {
                trace!("line {}: header {key} = {value:?}", cursor.line_num());
                handle(&key, &value, cursor)?;
            }
            None => trace!("line {}: ignoring {line:?}", cursor.line_num()),
        }
    }

    Ok(())
}

/// Read exactly `count` data records. Running out of input is fatal.
pub(crate) fn read_fixed<R, F>(
    cursor: &mut LineCursor<R>,
    count: usize,
    section: &'static str,
    mut record: F,
) -> Result<(), MineLibParseError>
where
    R: BufRead,
    F: FnMut(&[&str], usize) -> Result<(), MineLibParseError>,
{
    debug!("reading {count} records of {section}");

    for _ in 0..count {
        let line = cursor
            .next_data_line()?
            .ok_or(MineLibParseError::UnexpectedEof { section })?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        record(&fields, cursor.line_num())?;
    }

    Ok(())
}

/// Read records until an `EOF` marker, a short line or, when `stop_at_header`
/// is set, a line containing a colon.
///
/// `EOF` and colon lines are consumed along with the section, so a header
/// that ends the scan is never acted on. A short line is pushed back for the
/// header loop.
pub(crate) fn read_open_ended<R, F>(
    cursor: &mut LineCursor<R>,
    min_fields: usize,
    stop_at_header: bool,
    section: &'static str,
    mut record: F,
) -> Result<(), MineLibParseError>
where
    R: BufRead,
    F: FnMut(&[&str], usize) -> Result<(), MineLibParseError>,
{
    let mut count = 0;

    while let Some(line) = cursor.next_data_line()? {
        if line.eq_ignore_ascii_case("EOF") {
            break;
        }
        if stop_at_header && line.contains(':') {
            debug!(
                "line {}: {line:?} ends {section} and is dropped",
                cursor.line_num()
            );
            break;
        }
        if line.split_whitespace().count() < min_fields {
            cursor.push_back(line);
            break;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        record(&fields, cursor.line_num())?;
        count += 1;
    }

    debug!("read {count} records of {section}");
    Ok(())
}

/// Interpret the `<type> <args...>` tail of a limit line starting at
/// `fields[type_at]`.
///
/// `L` bounds from above, `G` from below and `I` on both sides. An
/// unrecognized type yields `None` and the row stays unconstrained.
pub(crate) fn bound(
    fields: &[&str],
    type_at: usize,
    line: usize,
) -> Result<Option<(f64, f64)>, MineLibParseError> {
    require_fields(fields, type_at + 1, line)?;

    match fields[type_at].to_ascii_uppercase().as_str() {
        "L" => {
            require_fields(fields, type_at + 2, line)?;
            Ok(Some((f64::NEG_INFINITY, number(fields[type_at + 1], line)?)))
        }
        "G" => {
            require_fields(fields, type_at + 2, line)?;
            Ok(Some((number(fields[type_at + 1], line)?, f64::INFINITY)))
        }
        "I" => {
            require_fields(fields, type_at + 3, line)?;
            Ok(Some((
                number(fields[type_at + 1], line)?,
                number(fields[type_at + 2], line)?,
            )))
        }
        other => {
            warn!("line {line}: unrecognized bound type {other:?}, row left unconstrained");
            Ok(None)
        }
    }
}

/// Read the `RESOURCE_CONSTRAINT_LIMITS` section shared by CPIT and PCPSP,
/// one line per (resource, period) pair.
pub(crate) fn read_resource_limits<R: BufRead>(
    cursor: &mut LineCursor<R>,
    num_resources: usize,
    num_periods: usize,
    limits: &mut ResourceLimits,
) -> Result<(), MineLibParseError> {
    let count = num_resources
        .checked_mul(num_periods)
        .ok_or(MineLibParseError::Overflow {
            line: cursor.line_num(),
            what: "resource constraint limit count",
        })?;

    read_fixed(cursor, count, "resource constraint limits", |fields, line| {
        require_fields(fields, 3, line)?;
        let resource = integer(fields[0], line)?;
        let period = integer(fields[1], line)?;

        if let Some((lower, upper)) = bound(fields, 2, line)? {
            limits.set_bounds(resource, period, lower, upper);
        }
        Ok(())
    })
}
