//! Confusion matrices: source 2D histograms rebinned onto particle categories.
//!
//! Each source bin's x and y midpoints are looked up in a [`CategoryTable`]
//! and the bin's sum of weights is added to the matching `(x, y)` category
//! cell. Bins whose coordinates match no category, or a category beyond the
//! matrix size, are not placed; their weight is kept as the matrix's unmapped
//! weight and reported once per matrix.
//!
//! Fills land on the lower edge of the category cell, `(ix, iy)`. Unplaced
//! weight is filled at its category indices, with `-1` for an axis that
//! matched nothing, so it reaches only the total distribution.

use jl_yoda::{Histo2D, HistoBin2D};

use crate::category::CategoryTable;
use crate::error::{LabelError, Result};

/// Title given to every produced matrix.
pub const MATRIX_TITLE: &str = "jet label matrix";

/// Suffix appended to the source path.
pub const MATRIX_PATH_SUFFIX: &str = "_matrix";

/// Default matrix size (none, g, q, c, b, photon).
pub const DEFAULT_MATRIX_SIZE: usize = 6;

/// A filled `N×N` category matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    histo: Histo2D,
    labels: Vec<String>,
    unmapped_weight: f64,
}

impl ConfusionMatrix {
    /// Create an empty matrix over `[0, N)²` with one unit bin per label pair.
    pub fn empty(path: impl Into<String>, labels: Vec<String>) -> Result<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(LabelError::InvalidMatrix("matrix needs at least one category".into()));
        }
        let nf = n as f64;
        let histo = Histo2D::uniform(n, 0.0, nf, n, 0.0, nf, path, MATRIX_TITLE)?;
        Ok(Self { histo, labels, unmapped_weight: 0.0 })
    }

    /// Rebuild a matrix from a histogram written by [`ConfusionMatrix::into_histo2d`].
    ///
    /// Labels are decoded from the `XCustomMajorTicks` annotation (every second
    /// tab-separated field); each bin is placed by the integer part of its midpoint.
    pub fn from_histo2d(h: &Histo2D) -> Result<Self> {
        let ticks = h.annotation("XCustomMajorTicks").ok_or_else(|| {
            LabelError::InvalidMatrix(format!("'{}' has no XCustomMajorTicks annotation", h.path))
        })?;
        let labels: Vec<String> = ticks.split('\t').skip(1).step_by(2).map(str::to_string).collect();

        let mut m = Self::empty(h.path.clone(), labels)?;
        m.histo.title = h.title.clone();
        m.histo.annotations = h.annotations.clone();
        m.histo.total = h.total;

        let n = m.n();
        for b in &h.bins {
            let (xm, ym) = (b.x_mid(), b.y_mid());
            if !(xm >= 0.0 && ym >= 0.0 && xm < n as f64 && ym < n as f64) {
                return Err(LabelError::InvalidMatrix(format!(
                    "'{}' has a bin at ({xm}, {ym}) outside the {n}x{n} label grid",
                    h.path
                )));
            }
            let idx = m.index(xm as usize, ym as usize);
            m.histo.bins[idx].dbn += b.dbn;
        }
        m.unmapped_weight = (m.histo.total.sum_w - m.mapped_weight()).max(0.0);
        Ok(m)
    }

    fn index(&self, ix: usize, iy: usize) -> usize {
        iy * self.n() + ix
    }

    /// Number of categories per axis.
    pub fn n(&self) -> usize {
        self.labels.len()
    }

    /// Ordered category labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Matrix path.
    pub fn path(&self) -> &str {
        &self.histo.path
    }

    /// X axis label (empty if unset).
    pub fn x_label(&self) -> &str {
        self.histo.annotation("XLabel").unwrap_or("")
    }

    /// Y axis label (empty if unset).
    pub fn y_label(&self) -> &str {
        self.histo.annotation("YLabel").unwrap_or("")
    }

    /// Volume of cell `(x category, y category)`.
    pub fn cell(&self, ix: usize, iy: usize) -> f64 {
        self.histo.bins[self.index(ix, iy)].volume()
    }

    /// Add weight `w` to cell `(ix, iy)`, filled at `(ix, iy)`.
    pub fn add(&mut self, ix: usize, iy: usize, w: f64) {
        debug_assert!(ix < self.n() && iy < self.n());
        self.histo.fill(ix as f64, iy as f64, w);
    }

    /// Record weight whose category pair lies outside the matrix.
    ///
    /// `None` stands for an axis with no matching category and is filled at `-1`.
    pub fn add_unmapped(&mut self, ix: Option<usize>, iy: Option<usize>, w: f64) {
        let coord = |i: Option<usize>| i.map_or(-1.0, |i| i as f64);
        let placed = self.histo.fill(coord(ix), coord(iy), w);
        debug_assert!(placed.is_none(), "unmapped weight landed in a cell");
        self.unmapped_weight += w;
    }

    /// Weight recorded through [`ConfusionMatrix::add_unmapped`].
    pub fn unmapped_weight(&self) -> f64 {
        self.unmapped_weight
    }

    /// Sum of all cell weights.
    pub fn mapped_weight(&self) -> f64 {
        self.histo.sum_w(false)
    }

    /// Underlying histogram.
    pub fn histo(&self) -> &Histo2D {
        &self.histo
    }

    /// Set a display annotation on the underlying histogram.
    pub fn set_annotation(&mut self, key: &str, value: impl Into<String>) {
        self.histo.set_annotation(key, value);
    }

    /// Consume into the underlying histogram for writing.
    pub fn into_histo2d(self) -> Histo2D {
        self.histo
    }
}

/// Matrix construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixOptions {
    /// Categories per axis (the first `size` entries of the table).
    pub size: usize,
    /// Normalize the source to unit total weight before mapping.
    pub normalize: bool,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self { size: DEFAULT_MATRIX_SIZE, normalize: true }
    }
}

/// Maps source histograms onto confusion matrices using a fixed category table.
#[derive(Debug, Clone)]
pub struct ConfusionMapper<'a> {
    table: &'a CategoryTable,
    options: MatrixOptions,
}

impl<'a> ConfusionMapper<'a> {
    /// Create a mapper. `options.size` must be between 1 and the table length.
    pub fn new(table: &'a CategoryTable, options: MatrixOptions) -> Result<Self> {
        if options.size == 0 || options.size > table.len() {
            return Err(LabelError::InvalidMatrix(format!(
                "matrix size {} must be between 1 and {} (category count)",
                options.size,
                table.len()
            )));
        }
        Ok(Self { table, options })
    }

    /// Category indices of a source bin's x and y midpoints.
    pub fn categorize(&self, bin: &HistoBin2D) -> (Option<usize>, Option<usize>) {
        (self.table.lookup(bin.x_mid()), self.table.lookup(bin.y_mid()))
    }

    /// Build the confusion matrix for `source`. The source itself is not modified.
    pub fn map(&self, source: &Histo2D) -> Result<ConfusionMatrix> {
        let normalized;
        let src = if self.options.normalize {
            let mut h = source.clone();
            h.normalize(1.0)?;
            normalized = h;
            &normalized
        } else {
            source
        };

        let n = self.options.size;
        let mut m = ConfusionMatrix::empty(
            format!("{}{MATRIX_PATH_SUFFIX}", src.path),
            self.table.labels(n),
        )?;

        let ticks = self.table.tick_annotation(n);
        m.set_annotation("XCustomMajorTicks", ticks.clone());
        m.set_annotation("YCustomMajorTicks", ticks);
        m.set_annotation("PlotTickLabels", "1");
        m.set_annotation("PlotXMajorTicks", "0");
        m.set_annotation("ZLabel", "arbitrary");
        m.set_annotation("XLabel", src.annotation("XLabel").unwrap_or(""));
        m.set_annotation("YLabel", src.annotation("YLabel").unwrap_or(""));
        m.set_annotation("ZCustomMajorTicks", "0.5\t$ $");

        let mut dropped_bins = 0usize;
        for b in &src.bins {
            match self.categorize(b) {
                (Some(ix), Some(iy)) if ix < n && iy < n => m.add(ix, iy, b.sum_w()),
                (ix, iy) => {
                    dropped_bins += 1;
                    m.add_unmapped(ix, iy, b.sum_w());
                }
            }
        }

        if dropped_bins > 0 && m.unmapped_weight() != 0.0 {
            tracing::warn!(
                path = %source.path,
                bins = dropped_bins,
                weight = m.unmapped_weight(),
                "source bins outside the category matrix were dropped"
            );
        }
        tracing::debug!(path = m.path(), mapped = m.mapped_weight(), "confusion matrix filled");
        Ok(m)
    }
}
