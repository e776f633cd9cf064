use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info};
use minelib_parser::read_precedence;
use rayon::prelude::*;

use crate::instance::{load, InstanceSummary, LoadError, LoadOptions, PrecedenceSource};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub parallel: bool,
    /// Worker threads when parallel, `num_cpus::get()` unless set.
    pub threads: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: num_cpus::get(),
        }
    }
}

#[derive(Debug)]
pub struct BatchResult {
    pub path: PathBuf,
    pub summary: Result<InstanceSummary, LoadError>,
    pub elapsed: Duration,
}

/// Load every file in `paths` and summarize it. Each file is parsed on its
/// own, results come back in input order.
///
/// A precedence file given by path is read once and shared by all problems.
pub fn load_all(
    paths: &[PathBuf],
    options: &LoadOptions,
    batch: &BatchOptions,
) -> Result<Vec<BatchResult>, LoadError> {
    let options = match &options.precedence {
        PrecedenceSource::Path(path) => {
            debug!("reading shared precedence file {path:?}");
            LoadOptions {
                precedence: PrecedenceSource::Shared(Arc::new(read_precedence(path)?)),
                ..options.clone()
            }
        }
        _ => options.clone(),
    };

    let start_time = Instant::now();

    let results: Vec<BatchResult> = if batch.parallel {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch.threads)
            .build()?;
        debug!("loading {} files on {} threads", paths.len(), pool.current_num_threads());

        pool.install(|| {
            paths
                .par_iter()
                .map(|path| load_one(path, &options))
                .collect()
        })
    } else {
        paths.iter().map(|path| load_one(path, &options)).collect()
    };

    info!(
        "loaded {} files in {:?}",
        results.len(),
        start_time.elapsed()
    );

    Ok(results)
}

fn load_one(path: &Path, options: &LoadOptions) -> BatchResult {
    let start_time = Instant::now();
    let summary = load(path, options).map(|instance| instance.summary());

    BatchResult {
        path: path.to_path_buf(),
        summary,
        elapsed: start_time.elapsed(),
    }
}
