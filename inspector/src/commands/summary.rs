use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, trace};
use minelib::{load, LoadOptions};

pub fn summary(path: PathBuf, options: LoadOptions, json: bool) -> Result<()> {
    let instance = load(&path, &options).with_context(|| format!("failed to load {path:?}"))?;
    trace!("parsed instance: {instance:#?}");

    let summary = instance.summary();
    debug!("summary of {path:?}: {summary:?}");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }

    Ok(())
}
