//! Label patterns: selecting and grouping objects by substrings of their paths.
//!
//! Patterns are the cartesian product of ordered vocabularies, e.g. jet
//! multiplicity × algorithm pair gives `Jet0_AktLabVsKtLab`. A key matches
//! the pattern that starts leftmost in it; ties at the same position go to
//! the earliest declared pattern.

use std::collections::BTreeMap;

use jl_yoda::AnalysisObject;
use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};

/// One factor of a label product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vocabulary {
    /// Plain word list, used as is.
    Words(Vec<String>),
    /// All unordered pairs `(a, b)` of `pairs` (declaration order, `a` before `b`),
    /// each rendered by substituting `{a}` and `{b}` in `template`.
    Pairs {
        /// Words to pair up.
        pairs: Vec<String>,
        /// Rendering template, e.g. `{a}LabVs{b}Lab`.
        template: String,
    },
}

impl Vocabulary {
    /// Build a plain word vocabulary.
    pub fn words(words: &[&str]) -> Self {
        Self::Words(words.iter().map(|w| w.to_string()).collect())
    }

    /// Build a pair vocabulary.
    pub fn pairs(words: &[&str], template: &str) -> Self {
        Self::Pairs {
            pairs: words.iter().map(|w| w.to_string()).collect(),
            template: template.to_string(),
        }
    }

    /// Terms in order.
    pub fn terms(&self) -> Vec<String> {
        match self {
            Self::Words(w) => w.clone(),
            Self::Pairs { pairs, template } => {
                let mut out = Vec::new();
                for (i, a) in pairs.iter().enumerate() {
                    for b in &pairs[i + 1..] {
                        out.push(template.replace("{a}", a).replace("{b}", b));
                    }
                }
                out
            }
        }
    }
}

/// Vocabularies plus the separator joining one term of each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSpec {
    /// Separator between terms.
    #[serde(default)]
    pub separator: String,
    /// Ordered vocabularies; the first varies slowest.
    pub vocabularies: Vec<Vocabulary>,
}

impl SelectionSpec {
    /// Jet multiplicity × labeling-algorithm pair, e.g. `Inclusive_KtLabVsMaxPtLab`.
    pub fn matrix_default() -> Self {
        Self {
            separator: "_".to_string(),
            vocabularies: vec![
                Vocabulary::words(&["Inclusive", "Jet0", "Jet1", "Jet2", "Jet3"]),
                Vocabulary::pairs(&["Akt", "Kt", "Reclustered", "MaxPt"], "{a}LabVs{b}Lab"),
            ],
        }
    }

    /// Jet flavour × clustering algorithm, e.g. `GluonKt`.
    pub fn split_default() -> Self {
        Self {
            separator: String::new(),
            vocabularies: vec![
                Vocabulary::words(&["Unlabeled", "Photon", "Gluon", "Bottom", "Charm", "Light"]),
                Vocabulary::words(&["Kt", "Akt"]),
            ],
        }
    }

    /// Build the label set.
    pub fn build(&self) -> Result<LabelSet> {
        LabelSet::from_vocabularies(&self.vocabularies, &self.separator)
    }
}

/// A label built from one term of each vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelPattern {
    label: String,
    parts: Vec<String>,
}

impl LabelPattern {
    /// The joined label.
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// The vocabulary terms the label was built from.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

/// Ordered set of label patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    patterns: Vec<LabelPattern>,
}

impl LabelSet {
    /// Cartesian product of the vocabularies, first vocabulary varying slowest.
    pub fn from_vocabularies(vocabularies: &[Vocabulary], separator: &str) -> Result<Self> {
        if vocabularies.is_empty() {
            return Err(LabelError::InvalidVocabulary("no vocabularies given".to_string()));
        }
        let mut combos: Vec<Vec<String>> = vec![Vec::new()];
        for (i, v) in vocabularies.iter().enumerate() {
            let terms = v.terms();
            if terms.is_empty() {
                return Err(LabelError::InvalidVocabulary(format!("vocabulary {i} has no terms")));
            }
            combos = combos
                .into_iter()
                .flat_map(|prefix| {
                    terms.iter().map(move |t| {
                        let mut p = prefix.clone();
                        p.push(t.clone());
                        p
                    })
                })
                .collect();
        }
        Self::from_patterns(
            combos.into_iter().map(|parts| LabelPattern { label: parts.join(separator), parts }),
        )
    }

    /// Label set from literal labels.
    pub fn from_labels<S: AsRef<str>>(labels: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::from_patterns(labels.into_iter().map(|l| LabelPattern {
            label: l.as_ref().to_string(),
            parts: vec![l.as_ref().to_string()],
        }))
    }

    fn from_patterns(patterns: impl IntoIterator<Item = LabelPattern>) -> Result<Self> {
        let patterns: Vec<LabelPattern> = patterns.into_iter().collect();
        if patterns.is_empty() {
            return Err(LabelError::InvalidVocabulary("no label patterns".to_string()));
        }
        if patterns.iter().any(|p| p.label.is_empty()) {
            return Err(LabelError::InvalidVocabulary("empty label pattern".to_string()));
        }
        Ok(Self { patterns })
    }

    /// Patterns in match-priority order.
    pub fn patterns(&self) -> &[LabelPattern] {
        &self.patterns
    }

    /// Leftmost pattern occurrence in `text` as `(byte offset, pattern)`.
    pub fn find(&self, text: &str) -> Option<(usize, &LabelPattern)> {
        let mut best: Option<(usize, &LabelPattern)> = None;
        for p in &self.patterns {
            if let Some(pos) = text.find(p.as_str())
                && best.is_none_or(|(b, _)| pos < b)
            {
                best = Some((pos, p));
            }
        }
        best
    }

    /// The pattern a key belongs to.
    pub fn classify(&self, key: &str) -> Result<&LabelPattern> {
        self.find(key)
            .map(|(_, p)| p)
            .ok_or_else(|| LabelError::NoCategoryMatch { key: key.to_string() })
    }

    /// Remove every non-overlapping pattern occurrence, scanning left to right.
    pub fn strip(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some((pos, p)) = self.find(rest) {
            out.push_str(&rest[..pos]);
            rest = &rest[pos + p.as_str().len()..];
        }
        out.push_str(rest);
        out
    }
}

/// Items grouped by matched label.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<T> {
    /// Label → items in input order.
    pub groups: BTreeMap<String, Vec<T>>,
    /// Keys that matched no pattern, in input order.
    pub dropped: Vec<String>,
}

impl<T> Default for Grouped<T> {
    fn default() -> Self {
        Self { groups: BTreeMap::new(), dropped: Vec::new() }
    }
}

/// Group `(key, item)` pairs by the label matched in each key. Unmatched keys are dropped.
pub fn group_by_label<K, T>(set: &LabelSet, items: impl IntoIterator<Item = (K, T)>) -> Grouped<T>
where
    K: AsRef<str>,
{
    items.into_iter().fold(Grouped::default(), |mut acc, (key, item)| {
        let key = key.as_ref();
        match set.classify(key) {
            Ok(p) => {
                tracing::info!(label = p.as_str(), key, "found label");
                acc.groups.entry(p.as_str().to_string()).or_default().push(item);
            }
            Err(e) => {
                tracing::debug!(%e, "skipping");
                acc.dropped.push(key.to_string());
            }
        }
        acc
    })
}

/// Group archive objects by the label in their path, stripping the label from each path.
pub fn group_objects(
    set: &LabelSet,
    objects: impl IntoIterator<Item = AnalysisObject>,
) -> Grouped<AnalysisObject> {
    group_by_label(
        set,
        objects.into_iter().map(|mut obj| {
            let key = obj.path().to_string();
            obj.set_path(set.strip(&key));
            (key, obj)
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jl_yoda::Histo1D;

    fn flavour_algo() -> LabelSet {
        LabelSet::from_vocabularies(
            &[Vocabulary::words(&["Light", "Gluon"]), Vocabulary::words(&["Akt", "Kt"])],
            "",
        )
        .unwrap()
    }

    #[test]
    fn product_order_first_vocabulary_slowest() {
        let set = flavour_algo();
        let labels: Vec<&str> = set.patterns().iter().map(LabelPattern::as_str).collect();
        assert_eq!(labels, vec!["LightAkt", "LightKt", "GluonAkt", "GluonKt"]);
        assert_eq!(set.patterns()[3].parts(), &["Gluon".to_string(), "Kt".to_string()]);
    }

    #[test]
    fn pair_vocabulary_matches_combinations() {
        let v = Vocabulary::pairs(&["Akt", "Kt", "Reclustered", "MaxPt"], "{a}LabVs{b}Lab");
        assert_eq!(
            v.terms(),
            vec![
                "AktLabVsKtLab",
                "AktLabVsReclusteredLab",
                "AktLabVsMaxPtLab",
                "KtLabVsReclusteredLab",
                "KtLabVsMaxPtLab",
                "ReclusteredLabVsMaxPtLab",
            ]
        );
        let set = SelectionSpec::matrix_default().build().unwrap();
        assert_eq!(set.patterns().len(), 30);
        assert_eq!(set.patterns()[0].as_str(), "Inclusive_AktLabVsKtLab");
        assert_eq!(set.patterns()[29].as_str(), "Jet3_ReclusteredLabVsMaxPtLab");
    }

    #[test]
    fn grouping_drops_unmatched_keys() {
        let set = flavour_algo();
        let keys = ["Jet0_LightAkt_pt", "Jet0_GluonKt_pt", "unrelated"];
        let g = group_by_label(&set, keys.iter().map(|k| (*k, k.len())));

        assert_eq!(g.groups.len(), 2);
        assert_eq!(g.groups["LightAkt"], vec![16]);
        assert_eq!(g.groups["GluonKt"], vec![15]);
        assert_eq!(g.dropped, vec!["unrelated".to_string()]);
    }

    #[test]
    fn leftmost_occurrence_wins_then_declaration_order() {
        let set = LabelSet::from_labels(["Kt", "LightKt", "Light"]).unwrap();
        // "LightKt" and "Light" both start at 0; "LightKt" is declared first.
        assert_eq!(set.classify("Jet0_LightKt").unwrap().as_str(), "LightKt");
        // "Kt" starts before "Light" here.
        assert_eq!(set.classify("Kt_Light").unwrap().as_str(), "Kt");

        let set = LabelSet::from_labels(["Light", "LightKt"]).unwrap();
        assert_eq!(set.classify("Jet0_LightKt").unwrap().as_str(), "Light");
    }

    #[test]
    fn classify_unmatched_is_no_category_match() {
        let err = flavour_algo().classify("/ANA/njets").unwrap_err();
        assert!(matches!(err, LabelError::NoCategoryMatch { ref key } if key == "/ANA/njets"));
    }

    #[test]
    fn strip_removes_every_occurrence() {
        let set = flavour_algo();
        assert_eq!(set.strip("/ANA/Jet0_LightAkt_pt"), "/ANA/Jet0__pt");
        assert_eq!(set.strip("GluonKtLightAkt_x_GluonKt"), "_x_");
        assert_eq!(set.strip("none"), "none");
    }

    #[test]
    fn group_objects_strips_paths_and_keeps_order() {
        let set = SelectionSpec::split_default().build().unwrap();
        let objs: Vec<AnalysisObject> = ["/A/Jet0_LightAkt_pt", "/A/njets", "/A/Jet1_LightAkt_pt"]
            .iter()
            .map(|p| Histo1D::uniform(1, 0.0, 1.0, *p, "").unwrap().into())
            .collect();

        let g = group_objects(&set, objs);
        let paths: Vec<&str> = g.groups["LightAkt"].iter().map(AnalysisObject::path).collect();
        assert_eq!(paths, vec!["/A/Jet0__pt", "/A/Jet1__pt"]);
        assert_eq!(g.dropped, vec!["/A/njets".to_string()]);
    }

    #[test]
    fn empty_vocabularies_rejected() {
        assert!(LabelSet::from_vocabularies(&[], "_").is_err());
        assert!(LabelSet::from_vocabularies(&[Vocabulary::Words(vec![])], "_").is_err());
        assert!(LabelSet::from_labels([""]).is_err());
        let single = Vocabulary::pairs(&["Akt"], "{a}Vs{b}");
        assert!(LabelSet::from_vocabularies(&[single], "").is_err());
    }

    #[test]
    fn selection_spec_deserializes_both_vocabulary_forms() {
        let json = r#"{
            "separator": "_",
            "vocabularies": [["Jet0"], {"pairs": ["Akt", "Kt"], "template": "{a}LabVs{b}Lab"}]
        }"#;
        let spec: SelectionSpec = serde_json::from_str(json).unwrap();
        let set = spec.build().unwrap();
        assert_eq!(set.patterns().len(), 1);
        assert_eq!(set.patterns()[0].as_str(), "Jet0_AktLabVsKtLab");
    }
}
