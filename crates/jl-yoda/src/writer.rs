//! YODA text archive writer.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::{Result, YodaError};
use crate::histogram::{Histo1D, Histo2D};
use crate::object::{AnalysisObject, RawObject};
use crate::reader::is_gzip_path;

/// Write objects to `path`, gzip-compressed when the path ends in `.gz`.
pub fn write_archive<'a>(
    objects: impl IntoIterator<Item = &'a AnalysisObject>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let text = to_yoda_string(objects);
    let fail = |source| YodaError::OutputWriteFailure { path: path.to_path_buf(), source };

    if is_gzip_path(path) {
        let file = std::fs::File::create(path).map_err(fail)?;
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(text.as_bytes()).map_err(fail)?;
        enc.finish().map_err(fail)?;
    } else {
        std::fs::write(path, &text).map_err(fail)?;
    }

    tracing::debug!(path = %path.display(), bytes = text.len(), "archive written");
    Ok(())
}

/// Serialize objects to YODA text.
pub fn to_yoda_string<'a>(objects: impl IntoIterator<Item = &'a AnalysisObject>) -> String {
    let mut out = String::new();
    for obj in objects {
        match obj {
            AnalysisObject::Histo1D(h) => write_histo1d(&mut out, h),
            AnalysisObject::Histo2D(h) => write_histo2d(&mut out, h),
            AnalysisObject::Raw(r) => write_raw(&mut out, r),
        }
        out.push('\n');
    }
    out
}

/// Format like C++ `std::scientific` with precision 6, e.g. `1.000000e+00`.
pub fn fmt_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{v:.6e}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    match exp.parse::<i32>() {
        Ok(e) => format!("{mantissa}e{}{:02}", if e < 0 { '-' } else { '+' }, e.abs()),
        Err(_) => s,
    }
}

fn join_sci(values: &[f64]) -> String {
    values.iter().map(|v| fmt_sci(*v)).collect::<Vec<_>>().join("\t")
}

fn write_header(
    out: &mut String,
    tag: &str,
    path: &str,
    title: &str,
    type_name: &str,
    annotations: &crate::object::Annotations,
) {
    out.push_str(&format!("BEGIN {tag} {path}\n"));
    out.push_str(&format!("Path={path}\n"));
    out.push_str(&format!("Title={title}\n"));
    out.push_str(&format!("Type={type_name}\n"));
    for (k, v) in annotations {
        out.push_str(&format!("{k}={v}\n"));
    }
    out.push_str("---\n");
}

fn write_histo1d(out: &mut String, h: &Histo1D) {
    write_header(out, "YODA_HISTO1D", &h.path, &h.title, "Histo1D", &h.annotations);
    let area: f64 = h.bins.iter().map(|b| b.sum_w()).sum();
    out.push_str(&format!("# Mean: {}\n", h.total.mean().map(fmt_sci).unwrap_or_else(|| "nan".into())));
    out.push_str(&format!("# Area: {}\n", fmt_sci(area)));
    out.push_str("# ID\t ID\t sumw\t sumw2\t sumwx\t sumwx2\t numEntries\n");
    out.push_str(&format!("Total   \tTotal   \t{}\n", join_sci(&h.total.columns())));
    out.push_str(&format!("Underflow\tUnderflow\t{}\n", join_sci(&h.underflow.columns())));
    out.push_str(&format!("Overflow\tOverflow\t{}\n", join_sci(&h.overflow.columns())));
    out.push_str("# xlow\t xhigh\t sumw\t sumw2\t sumwx\t sumwx2\t numEntries\n");
    for b in &h.bins {
        out.push_str(&format!("{}\t{}\t{}\n", fmt_sci(b.x_low), fmt_sci(b.x_high), join_sci(&b.dbn.columns())));
    }
    out.push_str("END YODA_HISTO1D\n");
}

fn write_histo2d(out: &mut String, h: &Histo2D) {
    write_header(out, "YODA_HISTO2D", &h.path, &h.title, "Histo2D", &h.annotations);
    let (mx, my) = if h.total.sum_w == 0.0 {
        (f64::NAN, f64::NAN)
    } else {
        (h.total.sum_wx / h.total.sum_w, h.total.sum_wy / h.total.sum_w)
    };
    out.push_str(&format!("# Mean: ({}, {})\n", fmt_sci(mx), fmt_sci(my)));
    out.push_str(&format!("# Volume: {}\n", fmt_sci(h.sum_w(false))));
    out.push_str("# ID\t ID\t sumw\t sumw2\t sumwx\t sumwx2\t sumwy\t sumwy2\t sumwxy\t numEntries\n");
    out.push_str(&format!("Total   \tTotal   \t{}\n", join_sci(&h.total.columns())));
    out.push_str("# 2D outflow persistency not currently supported until API is stable\n");
    out.push_str(
        "# xlow\t xhigh\t ylow\t yhigh\t sumw\t sumw2\t sumwx\t sumwx2\t sumwy\t sumwy2\t sumwxy\t numEntries\n",
    );
    for b in &h.bins {
        let edges = [b.x_low, b.x_high, b.y_low, b.y_high];
        out.push_str(&format!("{}\t{}\n", join_sci(&edges), join_sci(&b.dbn.columns())));
    }
    out.push_str("END YODA_HISTO2D\n");
}

fn write_raw(out: &mut String, r: &RawObject) {
    let sep = if r.is_v2() { ": " } else { "=" };
    out.push_str(&format!("BEGIN {} {}\n", r.tag, r.path));
    out.push_str(&format!("Path{sep}{}\n", r.path));
    for (k, v) in &r.header {
        out.push_str(&format!("{k}{sep}{v}\n"));
    }
    out.push_str("---\n");
    for line in &r.body {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("END {}\n", r.tag));
}
