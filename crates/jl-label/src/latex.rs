//! LaTeX table rendering of confusion matrices.

use crate::matrix::ConfusionMatrix;

/// Format a percentage with one decimal, or `-` when it is at most 0.1.
pub fn round_percent(v: f64) -> String {
    if v > 0.1 { format!("{v:.1}") } else { "-".to_string() }
}

/// Render one matrix as a LaTeX `table` environment.
///
/// Rows are x categories (labelled by the rotated x-axis label), columns are
/// y categories (under the y-axis label). Cells show the bin volume in percent.
pub fn matrix_to_latex(m: &ConfusionMatrix) -> String {
    let labels = m.labels();
    let l = labels.len();

    let values: Vec<String> = (0..l)
        .map(|ix| (0..l).map(|iy| round_percent(100.0 * m.cell(ix, iy))).collect::<Vec<_>>().join(" & "))
        .collect();

    let mut rows = Vec::with_capacity(l + 6);
    rows.push(r"    \hline".to_string());
    rows.push(format!(
        r"    \multicolumn{{2}}{{|c|}}{{ }} & \multicolumn{{{l}}}{{c|}}{{{}}} \\",
        m.y_label()
    ));
    rows.push(format!(r"    \cline{{3-{}}}", l + 2));
    rows.push(format!(r"    \multicolumn{{2}}{{|c|}}{{ }} & {} \\", labels.join(" & ")));
    rows.push(r"    \hline".to_string());
    rows.push(format!(
        r"    \multirow{{{l}}}{{*}}{{\rotatebox{{90}}{{{}}}}} & {} & {} \\",
        m.x_label(),
        labels[0],
        values[0]
    ));
    for (label, row) in labels.iter().zip(&values).skip(1) {
        rows.push(format!(r"     & {label} & {row} \\"));
    }
    rows.push(r"    \hline".to_string());

    format!(
        "\\begin{{table}}[t]\n  \\centering\n  \\begin{{tabular}}{{|c|c|{}|}}\n{}\n  \\end{{tabular}}\n\\end{{table}}",
        "c".repeat(l),
        rows.join("\n")
    )
}

/// Render several matrices, each preceded by its path, separated by blank lines.
pub fn render_tables<'a>(matrices: impl IntoIterator<Item = &'a ConfusionMatrix>) -> String {
    matrices
        .into_iter()
        .map(|m| format!("{}\n{}", m.path(), matrix_to_latex(m)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(labels: &[&str], cells: &[((usize, usize), f64)]) -> ConfusionMatrix {
        let mut m =
            ConfusionMatrix::empty("/ANA/h_matrix", labels.iter().map(|s| s.to_string()).collect())
                .unwrap();
        m.set_annotation("XLabel", "akt");
        m.set_annotation("YLabel", "kt");
        for &((ix, iy), w) in cells {
            m.add(ix, iy, w);
        }
        m
    }

    #[test]
    fn percent_threshold() {
        assert_eq!(round_percent(100.0 * 0.05), "5.0");
        assert_eq!(round_percent(100.0 * 0.0005), "-");
        assert_eq!(round_percent(0.1), "-");
        assert_eq!(round_percent(0.11), "0.1");
        assert_eq!(round_percent(99.96), "100.0");
    }

    #[test]
    fn two_by_two_table_layout() {
        let m = matrix(&["$g$", "$q$"], &[((0, 0), 0.5), ((0, 1), 0.05), ((1, 1), 0.0005)]);
        let expected = r"\begin{table}[t]
  \centering
  \begin{tabular}{|c|c|cc|}
    \hline
    \multicolumn{2}{|c|}{ } & \multicolumn{2}{c|}{kt} \\
    \cline{3-4}
    \multicolumn{2}{|c|}{ } & $g$ & $q$ \\
    \hline
    \multirow{2}{*}{\rotatebox{90}{akt}} & $g$ & 50.0 & 5.0 \\
     & $q$ & - & - \\
    \hline
  \end{tabular}
\end{table}";
        assert_eq!(matrix_to_latex(&m), expected);
    }

    #[test]
    fn rows_are_x_categories() {
        let m = matrix(&["a", "b", "c"], &[((2, 0), 0.25)]);
        let tex = matrix_to_latex(&m);
        assert!(tex.contains(r"     & c & 25.0 & - & - \\"), "{tex}");
        assert!(tex.contains(r"\cline{3-5}"));
        assert!(tex.contains("{|c|c|ccc|}"));
    }

    #[test]
    fn tables_are_prefixed_by_path_and_separated() {
        let a = matrix(&["a"], &[((0, 0), 1.0)]);
        let b = matrix(&["b"], &[]);
        let text = render_tables([&a, &b]);
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("/ANA/h_matrix\n\\begin{table}[t]"));
        assert!(blocks[1].ends_with("\\end{table}"));
        assert!(render_tables(std::iter::empty::<&ConfusionMatrix>()).is_empty());
    }
}
