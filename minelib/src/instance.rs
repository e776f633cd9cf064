use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use log::debug;
use minelib_parser::{
    read_block_model, read_cpit, read_pcpsp, read_precedence, read_upit,
    structs::{BlockModel, Cpit, Pcpsp, PrecedenceGraph, Upit},
    MineLibParseError, PrecedenceInput,
};
use serde::Serialize;
use thiserror::Error;

use crate::dag::PrecedenceDag;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] MineLibParseError),
    #[error("cannot tell the instance kind of {0:?} from its extension")]
    UnknownKind(PathBuf),
    #[error("'{0}' is not an instance kind")]
    UnknownKindName(String),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceKind {
    BlockModel,
    Precedence,
    Upit,
    Cpit,
    Pcpsp,
}

impl InstanceKind {
    pub const ALL: [InstanceKind; 5] = [
        InstanceKind::BlockModel,
        InstanceKind::Precedence,
        InstanceKind::Upit,
        InstanceKind::Cpit,
        InstanceKind::Pcpsp,
    ];

    /// Guess the kind from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension() == extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            InstanceKind::BlockModel => "blocks",
            InstanceKind::Precedence => "prec",
            InstanceKind::Upit => "upit",
            InstanceKind::Cpit => "cpit",
            InstanceKind::Pcpsp => "pcpsp",
        }
    }
}

impl FromStr for InstanceKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocks" | "block_model" => Ok(InstanceKind::BlockModel),
            "prec" | "precedence" => Ok(InstanceKind::Precedence),
            "upit" => Ok(InstanceKind::Upit),
            "cpit" => Ok(InstanceKind::Cpit),
            "pcpsp" => Ok(InstanceKind::Pcpsp),
            _ => Err(LoadError::UnknownKindName(s.to_owned())),
        }
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where problem files get their precedence graph from.
#[derive(Debug, Clone, Default)]
pub enum PrecedenceSource {
    #[default]
    None,
    /// `<stem>.prec` next to the problem file, when it exists.
    Sibling,
    Path(PathBuf),
    /// A graph parsed once and attached to every problem.
    Shared(Arc<PrecedenceGraph>),
}

impl PrecedenceSource {
    fn input_for(&self, path: &Path) -> PrecedenceInput<'static> {
        match self {
            PrecedenceSource::None => PrecedenceInput::None,
            PrecedenceSource::Sibling => {
                let sibling = path.with_extension(InstanceKind::Precedence.extension());
                if sibling.is_file() {
                    PrecedenceInput::Path(sibling)
                } else {
                    debug!("no precedence file next to {path:?}");
                    PrecedenceInput::None
                }
            }
            PrecedenceSource::Path(path) => PrecedenceInput::Path(path.clone()),
            PrecedenceSource::Shared(graph) => PrecedenceInput::Graph(Arc::clone(graph)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Overrides detection by extension.
    pub kind: Option<InstanceKind>,
    /// Names for the attribute columns of a block model.
    pub attribute_names: Vec<String>,
    pub precedence: PrecedenceSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    BlockModel(BlockModel),
    Precedence(PrecedenceGraph),
    Upit(Upit),
    Cpit(Cpit),
    Pcpsp(Pcpsp),
}

/// Parse the file at `path` into the instance its kind calls for.
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Instance, LoadError> {
    let path = path.as_ref();
    let kind = options
        .kind
        .or_else(|| InstanceKind::from_path(path))
        .ok_or_else(|| LoadError::UnknownKind(path.to_path_buf()))?;

    debug!("loading {path:?} as {kind}");

    let instance = match kind {
        InstanceKind::BlockModel => {
            let names: Vec<&str> = options.attribute_names.iter().map(String::as_str).collect();
            Instance::BlockModel(read_block_model(path, Some(names.as_slice()))?)
        }
        InstanceKind::Precedence => Instance::Precedence(read_precedence(path)?),
        InstanceKind::Upit => Instance::Upit(read_upit(path, options.precedence.input_for(path))?),
        InstanceKind::Cpit => Instance::Cpit(read_cpit(path, options.precedence.input_for(path))?),
        InstanceKind::Pcpsp => {
            Instance::Pcpsp(read_pcpsp(path, options.precedence.input_for(path))?)
        }
    };

    Ok(instance)
}

impl Instance {
    pub fn kind(&self) -> InstanceKind {
        match self {
            Instance::BlockModel(_) => InstanceKind::BlockModel,
            Instance::Precedence(_) => InstanceKind::Precedence,
            Instance::Upit(_) => InstanceKind::Upit,
            Instance::Cpit(_) => InstanceKind::Cpit,
            Instance::Pcpsp(_) => InstanceKind::Pcpsp,
        }
    }

    /// The precedence graph of the instance, either the instance itself or
    /// the one attached to a problem.
    pub fn precedence(&self) -> Option<&PrecedenceGraph> {
        match self {
            Instance::BlockModel(_) => None,
            Instance::Precedence(graph) => Some(graph),
            Instance::Upit(upit) => upit.precedence.as_deref(),
            Instance::Cpit(cpit) => cpit.precedence.as_deref(),
            Instance::Pcpsp(pcpsp) => pcpsp.precedence.as_deref(),
        }
    }

    pub fn summary(&self) -> InstanceSummary {
        let mut summary = InstanceSummary::new(self.kind());

        match self {
            Instance::BlockModel(model) => {
                summary.num_blocks = model.num_blocks();
                summary.num_records = Some(model.len());
            }
            Instance::Precedence(graph) => {
                summary.num_blocks = graph.num_blocks();
                summary.num_records = Some(graph.len());
            }
            Instance::Upit(upit) => {
                summary.name = Some(upit.name.clone());
                summary.num_blocks = upit.num_blocks;
                summary.positive_total = Some(upit.positive_total());
                summary.negative_total = Some(upit.negative_total());
            }
            Instance::Cpit(cpit) => {
                summary.name = Some(cpit.name.clone());
                summary.num_blocks = cpit.num_blocks;
                summary.num_periods = Some(cpit.num_periods);
                summary.num_resources = Some(cpit.num_resources);
                summary.discount_rate = Some(cpit.discount_rate);
                summary.num_records = Some(cpit.resource_coefficients().count());
            }
            Instance::Pcpsp(pcpsp) => {
                summary.name = Some(pcpsp.name.clone());
                summary.num_blocks = pcpsp.num_blocks;
                summary.num_periods = Some(pcpsp.num_periods);
                summary.num_destinations = Some(pcpsp.num_destinations);
                summary.num_resources = Some(pcpsp.num_resources);
                summary.num_general_constraints = Some(pcpsp.num_general_constraints);
                summary.discount_rate = Some(pcpsp.discount_rate);
                summary.num_records = Some(
                    pcpsp.resource_coefficients().count() + pcpsp.general_coefficients().count(),
                );
            }
        }

        if let Some(graph) = self.precedence() {
            let dag = PrecedenceDag::new(graph);
            summary.num_arcs = Some(dag.num_arcs());
            summary.num_ranks = dag.extraction_ranks().map(|ranks| ranks.len());
        }

        summary
    }
}

/// Derived figures of an instance, as printed by the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSummary {
    pub kind: InstanceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub num_blocks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_periods: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_destinations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_resources: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_general_constraints: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_total: Option<f64>,
    /// Block lines, precedence lines or coefficient records, by kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_arcs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ranks: Option<usize>,
}

impl InstanceSummary {
    pub fn new(kind: InstanceKind) -> Self {
        Self {
            kind,
            name: None,
            num_blocks: 0,
            num_periods: None,
            num_destinations: None,
            num_resources: None,
            num_general_constraints: None,
            discount_rate: None,
            positive_total: None,
            negative_total: None,
            num_records: None,
            num_arcs: None,
            num_ranks: None,
        }
    }
}

impl fmt::Display for InstanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kind: {}", self.kind)?;
        if let Some(name) = &self.name {
            writeln!(f, "name: {name}")?;
        }
        writeln!(f, "blocks: {}", self.num_blocks)?;

        let counts = [
            ("periods", self.num_periods),
            ("destinations", self.num_destinations),
            ("resources", self.num_resources),
            ("general constraints", self.num_general_constraints),
            ("records", self.num_records),
            ("arcs", self.num_arcs),
            ("extraction ranks", self.num_ranks),
        ];
        for (label, count) in counts {
            if let Some(count) = count {
                writeln!(f, "{label}: {count}")?;
            }
        }

        let values = [
            ("discount rate", self.discount_rate),
            ("positive total", self.positive_total),
            ("negative total", self.negative_total),
        ];
        for (label, value) in values {
            if let Some(value) = value {
                writeln!(f, "{label}: {value}")?;
            }
        }

        Ok(())
    }
}
