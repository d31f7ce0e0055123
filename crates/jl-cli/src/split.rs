//! `jetlabel split`: one archive per label found in object paths.

use anyhow::{Context, Result};
use jl_label::{OutputNaming, group_objects};
use jl_yoda::{read_archive, write_archive};
use std::path::Path;

use crate::config::Config;

pub fn cmd_split(
    input: &Path,
    out_dir: &Path,
    naming: OutputNaming,
    cfg: &Config,
) -> Result<()> {
    let labels = cfg.split_labels()?;
    let archive =
        read_archive(input).with_context(|| format!("failed to read {}", input.display()))?;
    let n_in = archive.len();

    let grouped = group_objects(&labels, archive.into_objects());
    if grouped.groups.is_empty() {
        tracing::warn!(input = %input.display(), objects = n_in, "no object path carries a split label");
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    for (label, objects) in &grouped.groups {
        let path = out_dir.join(naming.file_name(input, label));
        write_archive(objects, &path)?;
        eprintln!("Wrote {} ({} objects)", path.display(), objects.len());
    }

    tracing::info!(
        archives = grouped.groups.len(),
        dropped = grouped.dropped.len(),
        "split complete"
    );
    Ok(())
}
