//! YODA text archive reader.
//!
//! An archive is a sequence of blocks:
//! ```text
//! BEGIN YODA_HISTO2D /MC_QCDAWARE_JETS/Jet0_AktLabVsKtLab
//! Path=/MC_QCDAWARE_JETS/Jet0_AktLabVsKtLab
//! Title=
//! Type=Histo2D
//! XLabel=anti-$k_t$ label
//! ---
//! # ID    ID    sumw  sumw2  sumwx  sumwx2  sumwy  sumwy2  sumwxy  numEntries
//! Total   Total 1.0e+00 ...
//! # xlow  xhigh ylow  yhigh  sumw   sumw2  sumwx  sumwx2  sumwy  sumwy2  sumwxy  numEntries
//! 2.05e+01 2.15e+01 2.05e+01 2.15e+01 ...
//! END YODA_HISTO2D
//! ```
//! `_V2` tags use `Key: value` headers instead of `Key=value`. Histo1D and
//! Histo2D blocks are decoded; everything else is kept as a [`RawObject`].

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::dbn::{Dbn1D, Dbn2D};
use crate::error::{Result, YodaError};
use crate::histogram::{Histo1D, HistoBin1D, Histo2D, HistoBin2D};
use crate::object::{AnalysisObject, Annotations, Archive, RawObject};

/// Read an archive from disk. Files ending in `.gz` are gunzipped first.
pub fn read_archive(path: impl AsRef<Path>) -> Result<Archive> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(YodaError::InputNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let text = if is_gzip_path(path) {
        let mut out = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut out)
            .map_err(|e| YodaError::malformed(0, format!("gzip: {e}")))?;
        out
    } else {
        String::from_utf8(bytes).map_err(|e| YodaError::malformed(0, format!("not UTF-8: {e}")))?
    };

    let archive = parse_archive(&text)?;
    tracing::info!(path = %path.display(), objects = archive.len(), "archive loaded");
    Ok(archive)
}

pub(crate) fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Parse archive text.
pub fn parse_archive(text: &str) -> Result<Archive> {
    let mut archive = Archive::new();
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

    while let Some((lineno, line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(rest) = trimmed.strip_prefix("BEGIN ") else {
            return Err(YodaError::malformed(lineno, format!("expected BEGIN, found '{trimmed}'")));
        };
        let mut parts = rest.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| YodaError::malformed(lineno, "BEGIN without object tag"))?
            .to_string();
        let tag_path = parts.next().unwrap_or("").to_string();

        let block = read_block(&mut lines, lineno, tag, tag_path)?;
        archive.insert(decode_block(block)?);
    }

    Ok(archive)
}

struct Block<'a> {
    begin_line: usize,
    tag: String,
    tag_path: String,
    header: Vec<(String, String)>,
    body: Vec<(usize, &'a str)>,
}

fn read_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    begin_line: usize,
    tag: String,
    tag_path: String,
) -> Result<Block<'a>> {
    let sep = if tag.ends_with("_V2") { ": " } else { "=" };
    let mut header = Vec::new();
    let mut body = Vec::new();
    let mut in_body = false;

    for (lineno, line) in lines {
        let trimmed = line.trim();
        if let Some(end_tag) = trimmed.strip_prefix("END ") {
            if end_tag.trim() != tag {
                return Err(YodaError::malformed(
                    lineno,
                    format!("END {} does not close BEGIN {tag}", end_tag.trim()),
                ));
            }
            return Ok(Block { begin_line, tag, tag_path, header, body });
        }
        if !in_body {
            if trimmed == "---" {
                in_body = true;
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            // Pre-1.6 archives have no `---` separator: data starts at the first non-header line.
            if let Some((k, v)) = split_header(line, sep) {
                header.push((k, v));
                continue;
            }
            in_body = true;
        }
        body.push((lineno, line));
    }

    Err(YodaError::malformed(begin_line, format!("unterminated block BEGIN {tag}")))
}

fn split_header(line: &str, sep: &str) -> Option<(String, String)> {
    if line.starts_with('#') {
        return None;
    }
    let (k, v) = match line.split_once(sep) {
        Some(kv) => kv,
        // `Title:` with an empty value has no trailing space.
        None if sep == ": " => line.strip_suffix(':').map(|k| (k, ""))?,
        None => return None,
    };
    let k = k.trim();
    if k.is_empty() || k.contains(char::is_whitespace) {
        return None;
    }
    Some((k.to_string(), v.trim().to_string()))
}

fn decode_block(block: Block<'_>) -> Result<AnalysisObject> {
    let kind = block.tag.trim_start_matches("YODA_").trim_end_matches("_V2").to_ascii_uppercase();
    match kind.as_str() {
        "HISTO1D" => decode_histo1d(block).map(AnalysisObject::Histo1D),
        "HISTO2D" => decode_histo2d(block).map(AnalysisObject::Histo2D),
        _ => Ok(AnalysisObject::Raw(decode_raw(block))),
    }
}

/// Split header entries into (path, title, annotations), dropping `Type`.
fn split_meta(block: &Block<'_>) -> (String, String, Annotations) {
    let mut path = block.tag_path.clone();
    let mut title = String::new();
    let mut annotations = Annotations::new();
    for (k, v) in &block.header {
        match k.as_str() {
            "Path" => path = v.clone(),
            "Title" => title = v.clone(),
            "Type" => {}
            _ => {
                annotations.insert(k.clone(), v.clone());
            }
        }
    }
    (path, title, annotations)
}

fn data_rows<'a>(body: &'a [(usize, &'a str)]) -> impl Iterator<Item = (usize, Vec<&'a str>)> {
    body.iter().filter_map(|&(lineno, line)| {
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            None
        } else {
            Some((lineno, t.split_whitespace().collect()))
        }
    })
}

fn parse_numbers(lineno: usize, fields: &[&str], expected: usize) -> Result<Vec<f64>> {
    if fields.len() != expected {
        return Err(YodaError::malformed(
            lineno,
            format!("expected {expected} columns, found {}", fields.len()),
        ));
    }
    fields
        .iter()
        .map(|f| {
            f.parse::<f64>()
                .map_err(|_| YodaError::malformed(lineno, format!("invalid number '{f}'")))
        })
        .collect()
}

fn decode_histo1d(block: Block<'_>) -> Result<Histo1D> {
    let (path, title, annotations) = split_meta(&block);
    let mut bins = Vec::new();
    let mut total = None;
    let mut underflow = Dbn1D::default();
    let mut overflow = Dbn1D::default();

    for (lineno, fields) in data_rows(&block.body) {
        match fields[0] {
            "Total" | "Underflow" | "Overflow" => {
                let nums = parse_numbers(lineno, &fields[2.min(fields.len())..], 5)?;
                let dbn = Dbn1D::from_columns(&nums);
                match fields[0] {
                    "Total" => total = Some(dbn),
                    "Underflow" => underflow = dbn,
                    _ => overflow = dbn,
                }
            }
            _ => {
                let nums = parse_numbers(lineno, &fields, 7)?;
                bins.push(HistoBin1D {
                    x_low: nums[0],
                    x_high: nums[1],
                    dbn: Dbn1D::from_columns(&nums[2..]),
                });
            }
        }
    }

    let total = total.unwrap_or_else(|| {
        let mut t = underflow;
        t += overflow;
        for b in &bins {
            t += b.dbn;
        }
        t
    });

    Ok(Histo1D { path, title, annotations, bins, total, underflow, overflow })
}

fn decode_histo2d(block: Block<'_>) -> Result<Histo2D> {
    let (path, title, annotations) = split_meta(&block);
    let mut bins = Vec::new();
    let mut total = None;

    for (lineno, fields) in data_rows(&block.body) {
        if fields[0] == "Total" {
            let nums = parse_numbers(lineno, &fields[2.min(fields.len())..], 8)?;
            total = Some(Dbn2D::from_columns(&nums));
            continue;
        }
        let nums = parse_numbers(lineno, &fields, 12)?;
        if !(nums[0] < nums[1] && nums[2] < nums[3]) {
            return Err(YodaError::malformed(lineno, "bin edges out of order"));
        }
        bins.push(HistoBin2D {
            x_low: nums[0],
            x_high: nums[1],
            y_low: nums[2],
            y_high: nums[3],
            dbn: Dbn2D::from_columns(&nums[4..]),
        });
    }

    let total = total.unwrap_or_else(|| {
        let mut t = Dbn2D::default();
        for b in &bins {
            t += b.dbn;
        }
        t
    });

    tracing::trace!(path = %path, bins = bins.len(), begin_line = block.begin_line, "decoded Histo2D");
    Ok(Histo2D { path, title, annotations, bins, total })
}

fn decode_raw(block: Block<'_>) -> RawObject {
    let mut path = block.tag_path.clone();
    let mut header = Vec::with_capacity(block.header.len());
    for (k, v) in block.header {
        if k == "Path" {
            path = v;
        } else {
            header.push((k, v));
        }
    }
    RawObject {
        tag: block.tag,
        path,
        header,
        body: block.body.into_iter().map(|(_, l)| l.to_string()).collect(),
    }
}
