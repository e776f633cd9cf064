use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, trace};

use crate::{
    cursor::LineCursor,
    precedence::PrecedenceInput,
    sections::{
        bound, for_each_header, integer, number, read_fixed, read_open_ended,
        read_resource_limits, require_fields,
    },
    structs::Pcpsp,
    MineLibParseError,
};

/// Parse a precedence constrained production scheduling instance.
pub fn parse_pcpsp<R: BufRead>(
    reader: R,
    precedence: PrecedenceInput<'_>,
) -> Result<Pcpsp, MineLibParseError> {
    let mut cursor = LineCursor::new(reader);
    let mut pcpsp = Pcpsp::default();

    for_each_header(&mut cursor, |key, value, cursor| {
        let line = cursor.line_num();
        match key {
            "NAME" => pcpsp.name = value.to_owned(),
            "TYPE" => pcpsp.kind = Some(value.to_owned()),
            "NBLOCKS" => pcpsp.num_blocks = integer(value, line)?,
            "NPERIODS" => pcpsp.num_periods = integer(value, line)?,
            "NDESTINATIONS" => pcpsp.num_destinations = integer(value, line)?,
            "NRESOURCE_SIDE_CONSTRAINTS" => pcpsp.num_resources = integer(value, line)?,
            "NGENERAL_SIDE_CONSTRAINTS" => pcpsp.num_general_constraints = integer(value, line)?,
            "DISCOUNT_RATE" => pcpsp.discount_rate = number(value, line)?,
            "OBJECTIVE_FUNCTION" => {
                let destinations = pcpsp.num_destinations;
                let width = destinations
                    .checked_add(1)
                    .ok_or(MineLibParseError::Overflow {
                        line,
                        what: "objective line width",
                    })?;
                read_fixed(cursor, pcpsp.num_blocks, "objective function", |fields, line| {
                    require_fields(fields, width, line)?;
                    let block = integer(fields[0], line)?;
                    if fields.len() > width {
                        trace!(
                            "line {line}: ignoring {} values past {destinations} destinations",
                            fields.len() - width
                        );
                    }
                    let profits = fields[1..=destinations]
                        .iter()
                        .map(|token| number(token, line))
                        .collect::<Result<Vec<f64>, _>>()?;
                    pcpsp.profits.insert(block, profits);
                    Ok(())
                })?
            }
            "RESOURCE_CONSTRAINT_LIMITS" => read_resource_limits(
                cursor,
                pcpsp.num_resources,
                pcpsp.num_periods,
                &mut pcpsp.limits,
            )?,
            "RESOURCE_CONSTRAINT_COEFFICIENTS" => read_open_ended(
                cursor,
                4,
                true,
                "resource constraint coefficients",
                |fields, line| {
                    let key = (
                        integer(fields[0], line)?,
                        integer(fields[1], line)?,
                        integer(fields[2], line)?,
                    );
                    pcpsp
                        .resource_coefficients
                        .insert(key, number(fields[3], line)?);
                    Ok(())
                },
            )?,
            "GENERAL_CONSTRAINT_LIMITS" => read_fixed(
                cursor,
                pcpsp.num_general_constraints,
                "general constraint limits",
                |fields, line| {
                    require_fields(fields, 2, line)?;
                    let row = integer(fields[0], line)?;
                    if let Some(bounds) = bound(fields, 1, line)? {
                        pcpsp.general_limits.insert(row, bounds);
                    }
                    Ok(())
                },
            )?,
            "GENERAL_CONSTRAINT_COEFFICIENTS" => read_open_ended(
                cursor,
                5,
                true,
                "general constraint coefficients",
                |fields, line| {
                    let key = (
                        integer(fields[0], line)?,
                        integer(fields[1], line)?,
                        integer(fields[2], line)?,
                        integer(fields[3], line)?,
                    );
                    pcpsp
                        .general_coefficients
                        .insert(key, number(fields[4], line)?);
                    Ok(())
                },
            )?,
            _ => debug!("line {line}: ignoring header {key}"),
        }
        Ok(())
    })?;

    pcpsp.precedence = precedence.resolve()?;

    Ok(pcpsp)
}

/// Parse the PCPSP file at `path`.
pub fn read_pcpsp<P: AsRef<Path>>(
    path: P,
    precedence: PrecedenceInput<'_>,
) -> Result<Pcpsp, MineLibParseError> {
    let file = File::open(path)?;
    parse_pcpsp(BufReader::new(file), precedence)
}
