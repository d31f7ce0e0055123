//! `jetlabel label-matrix` and `jetlabel tabulate`.

use anyhow::{Context, Result};
use jl_label::{ConfusionMapper, ConfusionMatrix, LabelError, render_tables};
use jl_yoda::{AnalysisObject, YodaError, read_archive, write_archive};
use std::path::Path;

use crate::config::Config;

/// Summary of a `label-matrix` run.
#[derive(Debug, Default)]
pub struct MatrixRun {
    pub written: usize,
    pub skipped: usize,
}

pub fn cmd_label_matrix(
    input: &Path,
    output: &Path,
    tables: &Path,
    cfg: &Config,
) -> Result<MatrixRun> {
    let table = cfg.category_table()?;
    let labels = cfg.matrix_labels()?;
    let mapper = ConfusionMapper::new(&table, cfg.matrix_options())?;

    let archive =
        read_archive(input).with_context(|| format!("failed to read {}", input.display()))?;

    let mut run = MatrixRun::default();
    let mut matrices: Vec<ConfusionMatrix> = Vec::new();
    for (path, obj) in archive.iter() {
        let Some((_, label)) = labels.find(path) else {
            tracing::debug!(path, "no matrix label");
            continue;
        };
        tracing::info!(label = label.as_str(), path, "found label");

        let Some(h) = obj.as_histo2d() else {
            tracing::warn!(path, kind = obj.type_name(), "labelled object is not a Histo2D; skipped");
            run.skipped += 1;
            continue;
        };
        match mapper.map(h) {
            Ok(m) => matrices.push(m),
            Err(LabelError::Yoda(YodaError::Histogram(msg))) => {
                tracing::warn!(path, "{msg}; skipped");
                run.skipped += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("failed to build matrix for {path}")),
        }
    }

    let text = render_tables(&matrices);
    run.written = matrices.len();

    let objects: Vec<AnalysisObject> =
        matrices.into_iter().map(|m| m.into_histo2d().into()).collect();
    write_archive(&objects, output)?;
    write_tables(tables, &text)?;

    tracing::info!(matrices = run.written, skipped = run.skipped, "label-matrix complete");
    Ok(run)
}

pub fn cmd_tabulate(input: &Path, tables: &Path) -> Result<usize> {
    let archive =
        read_archive(input).with_context(|| format!("failed to read {}", input.display()))?;

    let mut matrices = Vec::new();
    for (path, obj) in archive.iter() {
        let Some(h) = obj.as_histo2d() else {
            tracing::debug!(path, kind = obj.type_name(), "not a matrix");
            continue;
        };
        match ConfusionMatrix::from_histo2d(h) {
            Ok(m) => matrices.push(m),
            Err(e) => tracing::warn!(path, "{e}; skipped"),
        }
    }

    write_tables(tables, &render_tables(&matrices))?;
    Ok(matrices.len())
}

fn write_tables(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .map_err(|source| YodaError::OutputWriteFailure { path: path.to_path_buf(), source })?;
    Ok(())
}
