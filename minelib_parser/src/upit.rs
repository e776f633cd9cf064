use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{
    cursor::LineCursor,
    precedence::PrecedenceInput,
    sections::{for_each_header, integer, number, read_fixed, require_fields},
    structs::Upit,
    MineLibParseError,
};

/// Parse an ultimate pit limit instance.
pub fn parse_upit<R: BufRead>(
    reader: R,
    precedence: PrecedenceInput<'_>,
) -> Result<Upit, MineLibParseError> {
    let mut cursor = LineCursor::new(reader);
    let mut upit = Upit::default();

    for_each_header(&mut cursor, |key, value, cursor| {
        let line = cursor.line_num();
        match key {
            "NAME" => upit.name = value.to_owned(),
            "TYPE" => upit.kind = Some(value.to_owned()),
            "NBLOCKS" => upit.num_blocks = integer(value, line)?,
            "OBJECTIVE_FUNCTION" => {
                read_fixed(cursor, upit.num_blocks, "objective function", |fields, line| {
                    require_fields(fields, 2, line)?;
                    upit.profits
                        .insert(integer(fields[0], line)?, number(fields[1], line)?);
                    Ok(())
                })?
            }
            _ => debug!("line {line}: ignoring header {key}"),
        }
        Ok(())
    })?;

    upit.precedence = precedence.resolve()?;

    Ok(upit)
}

/// Parse the UPIT file at `path`.
pub fn read_upit<P: AsRef<Path>>(
    path: P,
    precedence: PrecedenceInput<'_>,
) -> Result<Upit, MineLibParseError> {
    let file = File::open(path)?;
    parse_upit(BufReader::new(file), precedence)
}
