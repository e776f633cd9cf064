use std::{fs, path::PathBuf};

use anyhow::{bail, Result};
use log::{debug, info, warn};
use minelib::{parser::read_precedence, PrecedenceDag};

pub fn graph(input_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let precedence = read_precedence(&input_path)?;
    let dag = PrecedenceDag::new(&precedence);

    debug!(
        "Creating graph for {:?} with {} blocks and {} arcs",
        input_path,
        dag.num_blocks(),
        dag.num_arcs()
    );

    if precedence.is_empty() {
        bail!("{input_path:?} does not list any block");
    }
    if !dag.is_acyclic() {
        warn!("precedence graph of {input_path:?} contains a cycle");
    }

    fs::write(&output_path, dag.to_dot())?;

    info!("Wrote graphviz dot file to: {:?}", output_path);

    Ok(())
}
