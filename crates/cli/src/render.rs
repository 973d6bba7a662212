//! Plain-text rendering of explain, compare and catalog results

use kube_swagger_analyzer::SetDiff;
use kube_swagger_common::DiffRecord;
use kube_swagger_parser::PathEntry;
use std::collections::BTreeMap;
use std::fmt::Display;

/// One indented line per entry, label aligned in a second column
pub fn condensed(entries: &[PathEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|(path, label)| {
            let indent = "  ".repeat(path.len().saturating_sub(1));
            let name = path.last().map(String::as_str).unwrap_or("");
            format!("{:<60}    {}", format!("{indent}{name}"), label)
        })
        .collect()
}

/// `Type | Field` table of enumerated paths
pub fn explain_table(entries: &[PathEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|(path, label)| vec![label.clone(), path.join(".")])
        .collect();
    table(&["Type", "Field"], &rows)
}

/// `comparing <kind>: <source>@<gv> vs. <source>@<gv>` line above each pair
pub fn comparison_header(kind: &str, old: (&str, &str), new: (&str, &str)) -> String {
    format!("comparing {kind}: {}@{} vs. {}@{}", old.0, old.1, new.0, new.1)
}

/// `<change>   <path>` lines, optionally followed by both values
pub fn diff_lines<V: Display>(records: &[DiffRecord<V>], print_values: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for record in records {
        lines.push(format!("  {:<20}    {}", record.kind.short(), record.dotted_path()));
        if print_values {
            lines.push(format!("  - old: {}", value_or_dash(record.old.as_ref())));
            lines.push(format!("  - new: {}", value_or_dash(record.new.as_ref())));
        }
    }
    lines
}

fn value_or_dash<V: Display>(value: Option<&V>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// `Kind | Added | Removed | Same` table of group/version changes
pub fn kind_changes_table(changes: &BTreeMap<String, SetDiff>) -> String {
    let rows: Vec<Vec<String>> = changes
        .iter()
        .map(|(kind, change)| {
            vec![
                kind.clone(),
                change.added.join("\n"),
                change.removed.join("\n"),
                change.same.join("\n"),
            ]
        })
        .collect();
    table(&["Kind", "Added", "Removed", "Same"], &rows)
}

/// Bordered table; cells may span several lines
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (column, cell) in row.iter().enumerate().take(widths.len()) {
            let widest = cell.lines().map(|line| line.chars().count()).max().unwrap_or(0);
            widths[column] = widths[column].max(widest);
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    let header_cells: Vec<String> = headers.iter().map(|header| header.to_uppercase()).collect();
    push_row(&mut out, &header_cells, &widths);
    out.push_str(&separator);
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &widths);
        out.push_str(&separator);
        out.push('\n');
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let columns: Vec<Vec<&str>> = widths
        .iter()
        .enumerate()
        .map(|(column, _)| {
            cells
                .get(column)
                .map(|cell| cell.lines().collect())
                .unwrap_or_default()
        })
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0).max(1);

    for line in 0..height {
        out.push('|');
        for (column, &width) in widths.iter().enumerate() {
            let text = columns[column].get(line).copied().unwrap_or("");
            out.push_str(&format!(" {text:<width$} |"));
        }
        out.push('\n');
    }
}
