#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};
use minelib::{InstanceKind, LoadOptions, PrecedenceSource};

mod commands;

#[derive(Debug, Parser)]
#[command(author, version)]
/// MineLib instance inspector
struct App {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the derived figures of a MineLib instance
    Summary {
        #[arg(required = true)]
        path: PathBuf,

        #[command(flatten)]
        load: LoadArgs,

        /// Print the summary as JSON
        #[arg(short, long, env = "MINELIB_JSON")]
        json: bool,
    },
    /// Create a graphviz notation for a precedence file
    Graph {
        #[arg(required = true)]
        precedence_file: PathBuf,
        #[arg(required = true)]
        output: PathBuf,
    },
    /// Load every instance in a folder and report parse times
    Benchmark(Benchmark),
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Instance kind, detected from the file extension when omitted
    #[arg(short, long)]
    kind: Option<InstanceKind>,

    /// Precedence file attached to problem instances
    #[arg(short, long, env = "MINELIB_PRECEDENCE", conflicts_with = "sibling")]
    precedence: Option<PathBuf>,

    /// Attach `<stem>.prec` next to each problem file
    #[arg(short, long)]
    sibling: bool,

    /// Names for block model attribute columns, in column order
    #[arg(short, long, value_delimiter = ',')]
    attributes: Vec<String>,
}

impl LoadArgs {
    pub fn options(self) -> LoadOptions {
        let precedence = match (self.precedence, self.sibling) {
            (Some(path), _) => PrecedenceSource::Path(path),
            (None, true) => PrecedenceSource::Sibling,
            (None, false) => PrecedenceSource::None,
        };

        LoadOptions {
            kind: self.kind,
            attribute_names: self.attributes,
            precedence,
        }
    }
}

#[derive(Args, Debug)]
pub struct Benchmark {
    #[arg(required = true)]
    instance_folder: PathBuf,
    #[arg(required = true)]
    output: PathBuf,

    #[command(flatten)]
    load: LoadArgs,

    /// Worker threads, defaults to the number of logical cpus
    #[arg(short, long, env = "MINELIB_THREADS")]
    threads: Option<usize>,

    /// Load the files one after another on the current thread
    #[arg(long)]
    sequential: bool,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Summary { path, load, json } => commands::summary(path, load.options(), json),
        Commands::Graph {
            precedence_file,
            output,
        } => commands::graph(precedence_file, output),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
    } {
        error!("An error occurred: {:#}", err);
        std::process::exit(1);
    }
}
