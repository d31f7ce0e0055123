//! Output file naming for split archives.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How per-label output files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// `<label>.yoda`
    #[default]
    Label,
    /// `<input base name>_<label>.yoda`, so several inputs can share one output directory.
    Prefixed,
}

impl OutputNaming {
    /// Output file name for `label` split out of `input`.
    pub fn file_name(self, input: &Path, label: &str) -> String {
        match self {
            Self::Label => format!("{label}.yoda"),
            Self::Prefixed => format!("{}_{label}.yoda", input_base_name(input)),
        }
    }
}

impl fmt::Display for OutputNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Label => "label",
            Self::Prefixed => "prefixed",
        })
    }
}

impl FromStr for OutputNaming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "prefixed" => Ok(Self::Prefixed),
            other => Err(format!("unknown output naming '{other}' (expected 'label' or 'prefixed')")),
        }
    }
}

/// File name of `input` without a trailing `.yoda` or `.yoda.gz`.
pub fn input_base_name(input: &Path) -> String {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    for ext in [".yoda.gz", ".yoda"] {
        if let Some(stem) = name.strip_suffix(ext)
            && !stem.is_empty()
        {
            return stem.to_string();
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_naming_ignores_input() {
        assert_eq!(OutputNaming::Label.file_name(Path::new("/data/run.yoda"), "GluonKt"), "GluonKt.yoda");
    }

    #[test]
    fn prefixed_naming_strips_archive_extensions() {
        let n = OutputNaming::Prefixed;
        assert_eq!(n.file_name(Path::new("/data/run.yoda"), "LightAkt"), "run_LightAkt.yoda");
        assert_eq!(n.file_name(Path::new("run.yoda.gz"), "LightAkt"), "run_LightAkt.yoda");
        assert_eq!(n.file_name(Path::new("run.txt"), "LightAkt"), "run.txt_LightAkt.yoda");
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Prefixed".parse::<OutputNaming>().unwrap(), OutputNaming::Prefixed);
        assert_eq!(OutputNaming::default().to_string(), "label");
        assert!("suffix".parse::<OutputNaming>().is_err());
    }
}
