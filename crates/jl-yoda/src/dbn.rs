//! Weighted fill distributions stored per bin.

use std::ops::AddAssign;

/// Weighted moments of a 1D fill distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dbn1D {
    /// Sum of weights.
    pub sum_w: f64,
    /// Sum of squared weights.
    pub sum_w2: f64,
    /// Sum of `w * x`.
    pub sum_wx: f64,
    /// Sum of `w * x^2`.
    pub sum_wx2: f64,
    /// Number of fills (unweighted).
    pub num_entries: f64,
}

impl Dbn1D {
    /// Record one fill at `x` with weight `w`.
    pub fn fill(&mut self, x: f64, w: f64) {
        self.sum_w += w;
        self.sum_w2 += w * w;
        self.sum_wx += w * x;
        self.sum_wx2 += w * x * x;
        self.num_entries += 1.0;
    }

    /// Weighted mean, or `None` for an empty distribution.
    pub fn mean(&self) -> Option<f64> {
        if self.sum_w == 0.0 { None } else { Some(self.sum_wx / self.sum_w) }
    }

    pub(crate) fn from_columns(c: &[f64]) -> Self {
        Self { sum_w: c[0], sum_w2: c[1], sum_wx: c[2], sum_wx2: c[3], num_entries: c[4] }
    }

    pub(crate) fn columns(&self) -> [f64; 5] {
        [self.sum_w, self.sum_w2, self.sum_wx, self.sum_wx2, self.num_entries]
    }
}

impl AddAssign for Dbn1D {
    fn add_assign(&mut self, rhs: Self) {
        self.sum_w += rhs.sum_w;
        self.sum_w2 += rhs.sum_w2;
        self.sum_wx += rhs.sum_wx;
        self.sum_wx2 += rhs.sum_wx2;
        self.num_entries += rhs.num_entries;
    }
}

/// Weighted moments of a 2D fill distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dbn2D {
    /// Sum of weights.
    pub sum_w: f64,
    /// Sum of squared weights.
    pub sum_w2: f64,
    /// Sum of `w * x`.
    pub sum_wx: f64,
    /// Sum of `w * x^2`.
    pub sum_wx2: f64,
    /// Sum of `w * y`.
    pub sum_wy: f64,
    /// Sum of `w * y^2`.
    pub sum_wy2: f64,
    /// Sum of `w * x * y`.
    pub sum_wxy: f64,
    /// Number of fills (unweighted).
    pub num_entries: f64,
}

impl Dbn2D {
    /// Record one fill at `(x, y)` with weight `w`.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        self.sum_w += w;
        self.sum_w2 += w * w;
        self.sum_wx += w * x;
        self.sum_wx2 += w * x * x;
        self.sum_wy += w * y;
        self.sum_wy2 += w * y * y;
        self.sum_wxy += w * x * y;
        self.num_entries += 1.0;
    }

    /// Rescale all weights by `factor`.
    pub fn scale_w(&mut self, factor: f64) {
        self.sum_w *= factor;
        self.sum_w2 *= factor * factor;
        self.sum_wx *= factor;
        self.sum_wx2 *= factor;
        self.sum_wy *= factor;
        self.sum_wy2 *= factor;
        self.sum_wxy *= factor;
    }

    pub(crate) fn from_columns(c: &[f64]) -> Self {
        Self {
            sum_w: c[0],
            sum_w2: c[1],
            sum_wx: c[2],
            sum_wx2: c[3],
            sum_wy: c[4],
            sum_wy2: c[5],
            sum_wxy: c[6],
            num_entries: c[7],
        }
    }

    pub(crate) fn columns(&self) -> [f64; 8] {
        [
            self.sum_w,
            self.sum_w2,
            self.sum_wx,
            self.sum_wx2,
            self.sum_wy,
            self.sum_wy2,
            self.sum_wxy,
            self.num_entries,
        ]
    }
}

impl AddAssign for Dbn2D {
    fn add_assign(&mut self, rhs: Self) {
        self.sum_w += rhs.sum_w;
        self.sum_w2 += rhs.sum_w2;
        self.sum_wx += rhs.sum_wx;
        self.sum_wx2 += rhs.sum_wx2;
        self.sum_wy += rhs.sum_wy;
        self.sum_wy2 += rhs.sum_wy2;
        self.sum_wxy += rhs.sum_wxy;
        self.num_entries += rhs.num_entries;
    }
}
