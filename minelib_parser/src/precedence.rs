use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, trace};

use crate::{
    cursor::LineCursor,
    sections::{count_after, integer, require_fields},
    structs::PrecedenceGraph,
    MineLibParseError,
};

/// Parse a precedence file, one `<id> <n> <pred_1> ... <pred_n>` line per
/// block. Tokens after the `n` predecessors are ignored.
pub fn parse_precedence<R: BufRead>(reader: R) -> Result<PrecedenceGraph, MineLibParseError> {
    let mut cursor = LineCursor::new(reader);
    let mut graph = PrecedenceGraph::default();

    while let Some(line) = cursor.next_data_line()? {
        let line_num = cursor.line_num();
        let fields: Vec<&str> = line.split_whitespace().collect();
        require_fields(&fields, 2, line_num)?;

        let block: usize = integer(fields[0], line_num)?;
        let expected: usize = integer(fields[1], line_num)?;
        let listed = fields.len() - 2;

        if listed < expected {
            return Err(MineLibParseError::MissingPredecessors {
                line: line_num,
                block,
                expected,
                found: listed,
            });
        }
        if listed > expected {
            trace!(
                "line {line_num}: ignoring {} trailing tokens",
                listed - expected
            );
        }

        let predecessors = fields[2..2 + expected]
            .iter()
            .map(|token| integer(token, line_num))
            .collect::<Result<Vec<usize>, _>>()?;

        graph.num_blocks = graph.num_blocks.max(count_after(block, line_num)?);
        graph.predecessors.insert(block, predecessors);
    }

    debug!(
        "parsed precedence graph with {} blocks and {} arcs",
        graph.len(),
        graph.num_arcs()
    );

    Ok(graph)
}

/// Parse the precedence file at `path`.
pub fn read_precedence<P: AsRef<Path>>(path: P) -> Result<PrecedenceGraph, MineLibParseError> {
    let file = File::open(path)?;
    parse_precedence(BufReader::new(file))
}

/// Where the precedence graph of a problem comes from.
#[derive(Default)]
pub enum PrecedenceInput<'a> {
    /// An already parsed graph, attached as is.
    Graph(Arc<PrecedenceGraph>),
    /// A stream in precedence format.
    Reader(Box<dyn BufRead + 'a>),
    /// A precedence file on disk.
    Path(PathBuf),
    #[default]
    None,
}

impl PrecedenceInput<'_> {
    /// Turn the input into the graph attached to a problem record.
    pub fn resolve(self) -> Result<Option<Arc<PrecedenceGraph>>, MineLibParseError> {
        match self {
            Self::Graph(graph) => Ok(Some(graph)),
            Self::Reader(reader) => parse_precedence(reader).map(|graph| Some(Arc::new(graph))),
            Self::Path(path) => read_precedence(path).map(|graph| Some(Arc::new(graph))),
            Self::None => Ok(None),
        }
    }
}

impl fmt::Debug for PrecedenceInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph(graph) => f.debug_tuple("Graph").field(graph).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::None => f.write_str("None"),
        }
    }
}

impl From<PrecedenceGraph> for PrecedenceInput<'_> {
    fn from(graph: PrecedenceGraph) -> Self {
        Self::Graph(Arc::new(graph))
    }
}

impl From<Arc<PrecedenceGraph>> for PrecedenceInput<'_> {
    fn from(graph: Arc<PrecedenceGraph>) -> Self {
        Self::Graph(graph)
    }
}
