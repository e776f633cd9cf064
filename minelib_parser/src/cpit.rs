use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{
    cursor::LineCursor,
    precedence::PrecedenceInput,
    sections::{
        for_each_header, integer, number, read_fixed, read_open_ended, read_resource_limits,
        require_fields,
    },
    structs::Cpit,
    MineLibParseError,
};

/// Parse a constrained pit limit instance.
pub fn parse_cpit<R: BufRead>(
    reader: R,
    precedence: PrecedenceInput<'_>,
) -> Result<Cpit, MineLibParseError> {
    let mut cursor = LineCursor::new(reader);
    let mut cpit = Cpit::default();

    for_each_header(&mut cursor, |key, value, cursor| {
        let line = cursor.line_num();
        match key {
            "NAME" => cpit.name = value.to_owned(),
            "TYPE" => cpit.kind = Some(value.to_owned()),
            "NBLOCKS" => cpit.num_blocks = integer(value, line)?,
            "NPERIODS" => cpit.num_periods = integer(value, line)?,
            "NRESOURCE_SIDE_CONSTRAINTS" => cpit.num_resources = integer(value, line)?,
            "DISCOUNT_RATE" => cpit.discount_rate = number(value, line)?,
            "OBJECTIVE_FUNCTION" => {
                read_fixed(cursor, cpit.num_blocks, "objective function", |fields, line| {
                    require_fields(fields, 2, line)?;
                    cpit.profits
                        .insert(integer(fields[0], line)?, number(fields[1], line)?);
                    Ok(())
                })?
            }
            "RESOURCE_CONSTRAINT_LIMITS" => read_resource_limits(
                cursor,
                cpit.num_resources,
                cpit.num_periods,
                &mut cpit.limits,
            )?,
            "RESOURCE_CONSTRAINT_COEFFICIENTS" => read_open_ended(
                cursor,
                3,
                false,
                "resource constraint coefficients",
                |fields, line| {
                    let block = integer(fields[0], line)?;
                    let resource = integer(fields[1], line)?;
                    cpit.coefficients
                        .insert((block, resource), number(fields[2], line)?);
                    Ok(())
                },
            )?,
            _ => debug!("line {line}: ignoring header {key}"),
        }
        Ok(())
    })?;

    cpit.precedence = precedence.resolve()?;

    Ok(cpit)
}

/// Parse the CPIT file at `path`.
pub fn read_cpit<P: AsRef<Path>>(
    path: P,
    precedence: PrecedenceInput<'_>,
) -> Result<Cpit, MineLibParseError> {
    let file = File::open(path)?;
    parse_cpit(BufReader::new(file), precedence)
}
