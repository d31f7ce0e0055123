//! Analysis objects and the path-keyed archive that holds them.

use std::collections::{BTreeMap, HashMap};

use crate::histogram::{Histo1D, Histo2D};

/// Object annotations keyed by name.
pub type Annotations = BTreeMap<String, String>;

/// An object whose type is not decoded (scatters, profiles, counters, ...).
///
/// The body is kept verbatim so the object can be written back unchanged
/// apart from its path.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    /// Block tag after `BEGIN`, e.g. `YODA_SCATTER2D_V2`.
    pub tag: String,
    /// Object path.
    pub path: String,
    /// Header entries other than `Path`, in file order (includes `Type` and `Title`).
    pub header: Vec<(String, String)>,
    /// Data lines after the `---` separator.
    pub body: Vec<String>,
}

impl RawObject {
    /// Whether the header uses the YAML-style `Key: value` form.
    pub fn is_v2(&self) -> bool {
        self.tag.ends_with("_V2")
    }
}

/// Any object stored in a YODA archive.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisObject {
    /// Decoded 1D histogram.
    Histo1D(Histo1D),
    /// Decoded 2D histogram.
    Histo2D(Histo2D),
    /// Opaque object of another type.
    Raw(RawObject),
}

impl AnalysisObject {
    /// Object path.
    pub fn path(&self) -> &str {
        match self {
            Self::Histo1D(h) => &h.path,
            Self::Histo2D(h) => &h.path,
            Self::Raw(r) => &r.path,
        }
    }

    /// Replace the object path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        match self {
            Self::Histo1D(h) => h.path = path,
            Self::Histo2D(h) => h.path = path,
            Self::Raw(r) => r.path = path,
        }
    }

    /// YODA type name (`Histo1D`, `Histo2D`, or the raw `Type` header).
    pub fn type_name(&self) -> &str {
        match self {
            Self::Histo1D(_) => "Histo1D",
            Self::Histo2D(_) => "Histo2D",
            Self::Raw(r) => r
                .header
                .iter()
                .find(|(k, _)| k == "Type")
                .map(|(_, v)| v.as_str())
                .unwrap_or(&r.tag),
        }
    }

    /// Borrow as a 2D histogram, if it is one.
    pub fn as_histo2d(&self) -> Option<&Histo2D> {
        match self {
            Self::Histo2D(h) => Some(h),
            _ => None,
        }
    }
}

impl From<Histo1D> for AnalysisObject {
    fn from(h: Histo1D) -> Self {
        Self::Histo1D(h)
    }
}

impl From<Histo2D> for AnalysisObject {
    fn from(h: Histo2D) -> Self {
        Self::Histo2D(h)
    }
}

/// An ordered collection of analysis objects keyed by path.
///
/// Iteration follows file order. A later object with an already-seen path
/// replaces the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    objects: Vec<AnalysisObject>,
    index: HashMap<String, usize>,
}

impl Archive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, replacing any object with the same path.
    pub fn insert(&mut self, obj: AnalysisObject) {
        match self.index.get(obj.path()) {
            Some(&i) => {
                tracing::debug!(path = obj.path(), "duplicate path, keeping last");
                self.objects[i] = obj;
            }
            None => {
                self.index.insert(obj.path().to_string(), self.objects.len());
                self.objects.push(obj);
            }
        }
    }

    /// Look up an object by path.
    pub fn get(&self, path: &str) -> Option<&AnalysisObject> {
        self.index.get(path).map(|&i| &self.objects[i])
    }

    /// Iterate `(path, object)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnalysisObject)> {
        self.objects.iter().map(|o| (o.path(), o))
    }

    /// Object paths in file order.
    pub fn paths(&self) -> Vec<&str> {
        self.objects.iter().map(AnalysisObject::path).collect()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the archive holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Consume into the ordered object list.
    pub fn into_objects(self) -> Vec<AnalysisObject> {
        self.objects
    }
}

impl FromIterator<AnalysisObject> for Archive {
    fn from_iter<I: IntoIterator<Item = AnalysisObject>>(iter: I) -> Self {
        let mut a = Archive::new();
        for o in iter {
            a.insert(o);
        }
        a
    }
}
