use std::fs;

use anyhow::Result;
use log::{info, warn};
use minelib::{load_all, BatchOptions, InstanceKind};

use crate::Benchmark;

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.instance_folder.is_dir() {
        anyhow::bail!("instance_folder is not a directory")
    }

    let options = benchmark.load.options();

    let mut paths = vec![];
    for entry in benchmark.instance_folder.read_dir()? {
        let path = entry?.path();
        let known = options.kind.is_some() || InstanceKind::from_path(&path).is_some();
        if path.is_file() && known {
            paths.push(path);
        }
    }
    paths.sort();

    let mut batch = BatchOptions {
        parallel: !benchmark.sequential,
        ..Default::default()
    };
    if let Some(threads) = benchmark.threads {
        batch.threads = threads;
    }
    info!("loading {} instances with {batch:?}", paths.len());

    let lines: Vec<String> = load_all(&paths, &options, &batch)?
        .into_iter()
        .map(|result| match result.summary {
            Ok(summary) => format!(
                "{:?}: {} {} blocks in {:?}",
                result.path, summary.kind, summary.num_blocks, result.elapsed
            ),
            Err(err) => {
                warn!("failed to load {:?}: {err}", result.path);
                format!("{:?}: error: {err}", result.path)
            }
        })
        .collect();

    fs::write(benchmark.output, lines.join("\n"))?;

    Ok(())
}
