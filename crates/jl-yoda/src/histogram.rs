//! In-memory 1D and 2D histograms as stored in YODA archives.

use crate::dbn::{Dbn1D, Dbn2D};
use crate::error::{Result, YodaError};
use crate::object::Annotations;

/// A single bin of a [`Histo1D`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoBin1D {
    /// Lower bin edge (inclusive).
    pub x_low: f64,
    /// Upper bin edge (exclusive).
    pub x_high: f64,
    /// Fill distribution.
    pub dbn: Dbn1D,
}

impl HistoBin1D {
    /// Sum of weights in the bin.
    pub fn sum_w(&self) -> f64 {
        self.dbn.sum_w
    }
}

/// A 1D histogram with under/overflow distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct Histo1D {
    /// Object path, e.g. `/MC_JETS/Jet0_LightAkt_pt`.
    pub path: String,
    /// Object title.
    pub title: String,
    /// Free-form annotations (excluding `Path`, `Title` and `Type`).
    pub annotations: Annotations,
    /// In-range bins, ordered by `x_low`.
    pub bins: Vec<HistoBin1D>,
    /// Distribution of all fills, including under/overflow.
    pub total: Dbn1D,
    /// Underflow distribution.
    pub underflow: Dbn1D,
    /// Overflow distribution.
    pub overflow: Dbn1D,
}

impl Histo1D {
    /// Create an empty histogram with `n_bins` equal-width bins over `[x_min, x_max)`.
    pub fn uniform(
        n_bins: usize,
        x_min: f64,
        x_max: f64,
        path: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self> {
        check_range("x", n_bins, x_min, x_max)?;
        let edges = uniform_edges(n_bins, x_min, x_max);
        let bins = edges
            .windows(2)
            .map(|e| HistoBin1D { x_low: e[0], x_high: e[1], dbn: Dbn1D::default() })
            .collect();
        Ok(Self {
            path: path.into(),
            title: title.into(),
            annotations: Annotations::new(),
            bins,
            total: Dbn1D::default(),
            underflow: Dbn1D::default(),
            overflow: Dbn1D::default(),
        })
    }

    /// Fill at `x` with weight `w`. Returns the bin index, or `None` for under/overflow.
    pub fn fill(&mut self, x: f64, w: f64) -> Option<usize> {
        self.total.fill(x, w);
        let idx = self.bins.iter().position(|b| b.x_low <= x && x < b.x_high);
        match idx {
            Some(i) => self.bins[i].dbn.fill(x, w),
            None if self.bins.first().is_some_and(|b| x < b.x_low) => self.underflow.fill(x, w),
            None => self.overflow.fill(x, w),
        }
        idx
    }
}

/// A single bin of a [`Histo2D`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoBin2D {
    /// Lower x edge (inclusive).
    pub x_low: f64,
    /// Upper x edge (exclusive).
    pub x_high: f64,
    /// Lower y edge (inclusive).
    pub y_low: f64,
    /// Upper y edge (exclusive).
    pub y_high: f64,
    /// Fill distribution.
    pub dbn: Dbn2D,
}

impl HistoBin2D {
    /// Bin centre along x.
    pub fn x_mid(&self) -> f64 {
        0.5 * (self.x_low + self.x_high)
    }

    /// Bin centre along y.
    pub fn y_mid(&self) -> f64 {
        0.5 * (self.y_low + self.y_high)
    }

    /// Sum of weights in the bin.
    pub fn sum_w(&self) -> f64 {
        self.dbn.sum_w
    }

    /// Bin volume: the integrated content of the bin, i.e. its sum of weights.
    pub fn volume(&self) -> f64 {
        self.dbn.sum_w
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.x_low <= x && x < self.x_high && self.y_low <= y && y < self.y_high
    }
}

/// A 2D histogram. Out-of-range fills only enter the total distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Histo2D {
    /// Object path.
    pub path: String,
    /// Object title.
    pub title: String,
    /// Free-form annotations (excluding `Path`, `Title` and `Type`).
    pub annotations: Annotations,
    /// In-range bins.
    pub bins: Vec<HistoBin2D>,
    /// Distribution of all fills, including out-of-range ones.
    pub total: Dbn2D,
}

impl Histo2D {
    /// Create an empty histogram with `nx * ny` equal-size bins.
    ///
    /// Bins are ordered with x varying fastest: bin `(ix, iy)` sits at index
    /// `iy * nx + ix`.
    #[allow(clippy::too_many_arguments)]
    pub fn uniform(
        nx: usize,
        x_min: f64,
        x_max: f64,
        ny: usize,
        y_min: f64,
        y_max: f64,
        path: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self> {
        check_range("x", nx, x_min, x_max)?;
        check_range("y", ny, y_min, y_max)?;
        let xe = uniform_edges(nx, x_min, x_max);
        let ye = uniform_edges(ny, y_min, y_max);
        let mut bins = Vec::with_capacity(nx * ny);
        for y in ye.windows(2) {
            for x in xe.windows(2) {
                bins.push(HistoBin2D {
                    x_low: x[0],
                    x_high: x[1],
                    y_low: y[0],
                    y_high: y[1],
                    dbn: Dbn2D::default(),
                });
            }
        }
        Ok(Self {
            path: path.into(),
            title: title.into(),
            annotations: Annotations::new(),
            bins,
            total: Dbn2D::default(),
        })
    }

    /// Index of the bin containing `(x, y)`.
    pub fn bin_index_at(&self, x: f64, y: f64) -> Option<usize> {
        self.bins.iter().position(|b| b.contains(x, y))
    }

    /// Fill at `(x, y)` with weight `w`. Returns the bin index, or `None` if out of range.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) -> Option<usize> {
        self.total.fill(x, y, w);
        let idx = self.bin_index_at(x, y);
        if let Some(i) = idx {
            self.bins[i].dbn.fill(x, y, w);
        }
        idx
    }

    /// Sum of weights, optionally including out-of-range fills.
    pub fn sum_w(&self, include_overflows: bool) -> f64 {
        if include_overflows {
            self.total.sum_w
        } else {
            self.bins.iter().map(HistoBin2D::sum_w).sum()
        }
    }

    /// Rescale all weights by `factor`.
    pub fn scale_w(&mut self, factor: f64) {
        for b in &mut self.bins {
            b.dbn.scale_w(factor);
        }
        self.total.scale_w(factor);
    }

    /// Rescale so that the total sum of weights (overflows included) equals `target`.
    pub fn normalize(&mut self, target: f64) -> Result<()> {
        let area = self.sum_w(true);
        if area == 0.0 {
            return Err(YodaError::Histogram(format!(
                "cannot normalize '{}': null area",
                self.path
            )));
        }
        self.scale_w(target / area);
        Ok(())
    }

    /// Look up an annotation value.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Set an annotation value.
    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }
}

fn check_range(axis: &str, n: usize, lo: f64, hi: f64) -> Result<()> {
    if n == 0 {
        return Err(YodaError::Histogram(format!("{axis} axis needs at least one bin")));
    }
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(YodaError::Histogram(format!("invalid {axis} range [{lo}, {hi})")));
    }
    Ok(())
}

fn uniform_edges(n: usize, lo: f64, hi: f64) -> Vec<f64> {
    let step = (hi - lo) / n as f64;
    (0..=n).map(|i| if i == n { hi } else { lo + step * i as f64 }).collect()
}
