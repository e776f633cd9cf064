// Parsers for the MineLib open-pit mining formats.
// Line oriented, chumsky only for the `KEY: value` headers.

use thiserror::Error;

pub mod blocks;
pub mod cpit;
pub mod cursor;
pub mod lexical;
pub mod pcpsp;
pub mod precedence;
pub mod structs;
pub mod upit;

mod sections;

pub use blocks::{parse_block_model, read_block_model};
pub use cpit::{parse_cpit, read_cpit};
pub use pcpsp::{parse_pcpsp, read_pcpsp};
pub use precedence::{parse_precedence, read_precedence, PrecedenceInput};
pub use upit::{parse_upit, read_upit};

#[derive(Debug, Error)]
pub enum MineLibParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{0}' is neither a number nor an infinity literal")]
    InvalidNumber(String),
    #[error("'{0}' is not a valid integer")]
    InvalidInteger(String),
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: block {block} declares {expected} predecessors but lists only {found}")]
    MissingPredecessors {
        line: usize,
        block: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {what} does not fit in a machine word")]
    Overflow { line: usize, what: &'static str },
    #[error("unexpected end of input while reading {section}")]
    UnexpectedEof { section: &'static str },
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<MineLibParseError>,
    },
}

impl MineLibParseError {
    /// Attach a line number to a lexical error. Errors that already carry a
    /// location are returned unchanged.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            err @ (Self::InvalidNumber(_) | Self::InvalidInteger(_)) => Self::AtLine {
                line,
                source: Box::new(err),
            },
            other => other,
        }
    }

    /// The 1-based line the error was raised on, if it is known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TooFewFields { line, .. }
            | Self::MissingPredecessors { line, .. }
            | Self::Overflow { line, .. }
            | Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}
