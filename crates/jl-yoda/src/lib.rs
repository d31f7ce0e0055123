//! # jl-yoda
//!
//! Native reader and writer for YODA text histogram archives.
//!
//! Decodes `Histo1D` and `Histo2D` blocks into in-memory histograms and
//! carries every other object type through unchanged. Archives ending in
//! `.gz` are transparently (de)compressed.
//!
//! ## Example
//!
//! ```no_run
//! use jl_yoda::{AnalysisObject, read_archive, write_archive};
//!
//! let archive = read_archive("Rivet.yoda").unwrap();
//! for (path, obj) in archive.iter() {
//!     println!("{} ({})", path, obj.type_name());
//! }
//! let histos: Vec<&AnalysisObject> =
//!     archive.iter().map(|(_, o)| o).filter(|o| o.as_histo2d().is_some()).collect();
//! write_archive(histos, "histo2d-only.yoda").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dbn;
pub mod error;
pub mod histogram;
pub mod object;
pub mod reader;
pub mod writer;

pub use dbn::{Dbn1D, Dbn2D};
pub use error::{Result, YodaError};
pub use histogram::{Histo1D, HistoBin1D, Histo2D, HistoBin2D};
pub use object::{AnalysisObject, Annotations, Archive, RawObject};
pub use reader::{parse_archive, read_archive};
pub use writer::{fmt_sci, to_yoda_string, write_archive};
