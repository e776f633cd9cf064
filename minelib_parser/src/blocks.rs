use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{
    cursor::LineCursor,
    lexical::parse_float_token,
    sections::{count_after, integer, require_fields},
    structs::{AttributeValue, Block, BlockModel},
    MineLibParseError,
};

/// Parse a block model, one `<id> <x> <y> <z> [<attr>...]` line per block.
///
/// Extra columns take their names from `attribute_names` by position and are
/// called `attr_<n>` (1-based among the extra columns) past its end. A column
/// that does not parse as a number is kept as text.
pub fn parse_block_model<R: BufRead>(
    reader: R,
    attribute_names: Option<&[&str]>,
) -> Result<BlockModel, MineLibParseError> {
    let names = attribute_names.unwrap_or_default();
    let mut cursor = LineCursor::new(reader);
    let mut model = BlockModel::default();

    while let Some(line) = cursor.next_data_line()? {
        let line_num = cursor.line_num();
        let fields: Vec<&str> = line.split_whitespace().collect();
        require_fields(&fields, 4, line_num)?;

        let id: usize = integer(fields[0], line_num)?;
        let attributes = fields[4..]
            .iter()
            .enumerate()
            .map(|(position, token)| {
                let name = names
                    .get(position)
                    .map(|name| (*name).to_owned())
                    .unwrap_or_else(|| format!("attr_{}", position + 1));
                let value = parse_float_token(token)
                    .map(AttributeValue::Number)
                    .unwrap_or_else(|_| AttributeValue::Text((*token).to_owned()));
                (name, value)
            })
            .collect();

        let block = Block {
            x: integer(fields[1], line_num)?,
            y: integer(fields[2], line_num)?,
            z: integer(fields[3], line_num)?,
            attributes,
        };

        model.num_blocks = model.num_blocks.max(count_after(id, line_num)?);
        model.blocks.insert(id, block);
    }

    debug!(
        "parsed block model with {} blocks, num_blocks = {}",
        model.blocks.len(),
        model.num_blocks
    );

    Ok(model)
}

/// Parse the block model file at `path`.
pub fn read_block_model<P: AsRef<Path>>(
    path: P,
    attribute_names: Option<&[&str]>,
) -> Result<BlockModel, MineLibParseError> {
    let file = File::open(path)?;
    parse_block_model(BufReader::new(file), attribute_names)
}

#[cfg(test)]
mod tests {
    use crate::{structs::AttributeValue, MineLibParseError};

    use super::parse_block_model;

    static TEST_FILE: &str = include_str!("../../instances/sample.blocks");

    #[test]
    fn named_columns() {
        let model =
            parse_block_model("1 1 0 0 1200.0 0.8\n".as_bytes(), Some(&["tonnage", "grade"][..]))
                .unwrap();

        assert_eq!(model.coordinates(1), Some((1, 0, 0)));
        assert_eq!(
            model.attribute(1, "tonnage"),
            Some(&AttributeValue::Number(1200.0))
        );
        assert_eq!(model.attribute(1, "grade"), Some(&AttributeValue::Number(0.8)));
        assert_eq!(model.num_blocks(), 2);
    }

    #[test]
    fn unnamed_columns_are_numbered() {
        let model =
            parse_block_model("0 5 6 7 1.5 2.5 3.5\n".as_bytes(), Some(&["tonnage"][..])).unwrap();

        let names: Vec<&str> = model.block(0).unwrap().attributes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["tonnage", "attr_2", "attr_3"]);
        assert_eq!(model.coordinates(0), Some((5, 6, 7)));
    }

    #[test]
    fn text_attributes_fall_back_to_strings() {
        let model = parse_block_model(TEST_FILE.as_bytes(), None).unwrap();

        assert_eq!(model.len(), 5);
        assert_eq!(model.num_blocks(), 5);
        assert_eq!(
            model.attribute(0, "attr_3"),
            Some(&AttributeValue::Text("waste".to_owned()))
        );
        assert_eq!(
            model.attribute(4, "attr_2"),
            Some(&AttributeValue::Number(f64::INFINITY))
        );
        assert_eq!(model.coordinates(3), Some((0, 0, 1)));
    }

    #[test]
    fn sparse_ids_set_upper_bound() {
        let model = parse_block_model("7 0 0 0\n2 1 1 1\n".as_bytes(), None).unwrap();

        assert_eq!(model.num_blocks(), 8);
        assert_eq!(model.len(), 2);
        assert!(model.block(3).is_none());
        assert_eq!(model.coordinates(3), None);
        assert!(model.block(2).unwrap().attributes().next().is_none());
    }

    #[test]
    fn negative_coordinates() {
        let model = parse_block_model("0 -1 -2 -3\n".as_bytes(), None).unwrap();

        assert_eq!(model.coordinates(0), Some((-1, -2, -3)));
    }

    #[test]
    fn too_few_fields() {
        let err = parse_block_model("% header\n0 0 0 0\n1 0 0\n".as_bytes(), None).unwrap_err();

        match err {
            MineLibParseError::TooFewFields {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn largest_id_overflows_block_count() {
        let err = parse_block_model("0 0 0 0\n18446744073709551615 0 0 0\n".as_bytes(), None)
            .unwrap_err();

        assert!(matches!(err, MineLibParseError::Overflow { line: 2, .. }));
    }

    #[test]
    fn non_integer_coordinates() {
        let err = parse_block_model("0 0.5 0 0\n".as_bytes(), None).unwrap_err();

        assert_eq!(err.line(), Some(1));
    }
}
