//! # jl-label
//!
//! Jet-label bookkeeping on top of [`jl_yoda`] histograms.
//!
//! - [`CategoryTable`] maps particle-ID codes onto ordered display categories.
//! - [`ConfusionMapper`] rebins a 2D "labeler A vs labeler B" histogram onto an
//!   `N×N` category matrix, and [`render_tables`] prints matrices as LaTeX.
//! - [`LabelSet`] matches label substrings in object paths, used both to pick
//!   histograms for matrices and to split archives per label.
//!
//! ## Example
//!
//! ```no_run
//! use jl_label::{CategoryTable, ConfusionMapper, MatrixOptions, SelectionSpec, render_tables};
//!
//! let archive = jl_yoda::read_archive("Rivet.yoda").unwrap();
//! let table = CategoryTable::jet_flavours();
//! let mapper = ConfusionMapper::new(&table, MatrixOptions::default()).unwrap();
//! let labels = SelectionSpec::matrix_default().build().unwrap();
//!
//! let matrices: Vec<_> = archive
//!     .iter()
//!     .filter(|(path, _)| labels.find(path).is_some())
//!     .filter_map(|(_, obj)| obj.as_histo2d())
//!     .map(|h| mapper.map(h).unwrap())
//!     .collect();
//! println!("{}", render_tables(&matrices));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod error;
pub mod latex;
pub mod matrix;
pub mod naming;
pub mod select;

pub use category::{Category, CategorySpec, CategoryTable};
pub use error::{LabelError, Result};
pub use latex::{matrix_to_latex, render_tables, round_percent};
pub use matrix::{
    ConfusionMapper, ConfusionMatrix, DEFAULT_MATRIX_SIZE, MATRIX_PATH_SUFFIX, MATRIX_TITLE,
    MatrixOptions,
};
pub use naming::{OutputNaming, input_base_name};
pub use select::{
    Grouped, LabelPattern, LabelSet, SelectionSpec, Vocabulary, group_by_label, group_objects,
};
