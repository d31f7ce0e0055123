//! Particle categories and particle-ID lookup.

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

/// Serializable form of a category: a display label and the particle-ID codes it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Display label (LaTeX allowed).
    pub label: String,
    /// Particle-ID codes belonging to this category.
    pub codes: Vec<i32>,
}

impl CategorySpec {
    /// Convenience constructor.
    pub fn new(label: impl Into<String>, codes: &[i32]) -> Self {
        Self { label: label.into(), codes: codes.to_vec() }
    }
}

/// One entry of a [`CategoryTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Target axis bin.
    pub index: usize,
    /// Display label.
    pub label: String,
    /// Particle-ID codes belonging to this category.
    pub codes: Vec<i32>,
}

impl Category {
    /// Whether `v` lies strictly inside `(c - 0.5, c + 0.5)` for one of the codes.
    pub fn matches(&self, v: f64) -> bool {
        self.codes.iter().any(|&c| {
            let c = f64::from(c);
            c - 0.5 < v && v < c + 0.5
        })
    }
}

/// Ordered, immutable table of particle categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Build a table; categories are indexed in the given order.
    ///
    /// A code owned by more than one category is accepted but logged: lookup
    /// resolves it to the earliest category.
    pub fn new(specs: impl IntoIterator<Item = CategorySpec>) -> Result<Self> {
        let categories: Vec<Category> = specs
            .into_iter()
            .enumerate()
            .map(|(index, s)| Category { index, label: s.label, codes: s.codes })
            .collect();

        if categories.is_empty() {
            return Err(LabelError::InvalidCategories("table is empty".to_string()));
        }
        for c in &categories {
            if c.codes.is_empty() {
                return Err(LabelError::InvalidCategories(format!(
                    "category {} ('{}') has no codes",
                    c.index, c.label
                )));
            }
            if c.label.contains(['\t', '\n']) {
                return Err(LabelError::InvalidCategories(format!(
                    "category {} label must not contain tabs or newlines",
                    c.index
                )));
            }
        }

        let table = Self { categories };
        let dups = table.shared_codes();
        if !dups.is_empty() {
            tracing::warn!(codes = ?dups, "particle-ID codes shared between categories; earliest category wins");
        }
        Ok(table)
    }

    /// Jet flavour labels: none, gluon, light quark, charm, bottom, photon, leptons.
    pub fn jet_flavours() -> Self {
        let specs = [
            CategorySpec::new("none", &[0]),
            CategorySpec::new("$g$", &[21]),
            CategorySpec::new("$q$", &[-3, -2, -1, 1, 2, 3]),
            CategorySpec::new("$c$", &[-4, 4]),
            CategorySpec::new("$b$", &[-5, 5]),
            CategorySpec::new(r"$\gamma$", &[22]),
            CategorySpec::new("$e^-$", &[11]),
            CategorySpec::new("$e^+$", &[-11]),
            CategorySpec::new(r"$\mu^-$", &[13]),
            CategorySpec::new(r"$\mu^+$", &[-13]),
            CategorySpec::new(r"$\tau$", &[15]),
        ];
        Self {
            categories: specs
                .into_iter()
                .enumerate()
                .map(|(index, s)| Category { index, label: s.label, codes: s.codes })
                .collect(),
        }
    }

    /// Index of the first category whose code window contains `v`.
    pub fn lookup(&self, v: f64) -> Option<usize> {
        self.categories.iter().find(|c| c.matches(v)).map(|c| c.index)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always `false` for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate categories in order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Labels of the first `n` categories.
    pub fn labels(&self, n: usize) -> Vec<String> {
        self.categories.iter().take(n).map(|c| c.label.clone()).collect()
    }

    /// Serializable form of the table.
    pub fn specs(&self) -> Vec<CategorySpec> {
        self.categories
            .iter()
            .map(|c| CategorySpec { label: c.label.clone(), codes: c.codes.clone() })
            .collect()
    }

    /// Codes that appear in more than one category, sorted.
    pub fn shared_codes(&self) -> Vec<i32> {
        let mut seen = std::collections::BTreeMap::<i32, usize>::new();
        for c in &self.categories {
            for &code in &c.codes {
                *seen.entry(code).or_default() += 1;
            }
        }
        seen.into_iter().filter(|&(_, n)| n > 1).map(|(code, _)| code).collect()
    }

    /// Custom tick annotation for the first `n` categories: `"0.50\tnone\t1.50\t$g$..."`.
    pub fn tick_annotation(&self, n: usize) -> String {
        self.categories
            .iter()
            .take(n)
            .map(|c| format!("{:.2}\t{}", c.index as f64 + 0.5, c.label))
            .collect::<Vec<_>>()
            .join("\t")
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::jet_flavours()
    }
}
