//! Output formatting utilities

use crate::application::MergeReport;
use std::path::PathBuf;

/// Newline-joined lines, empty for no items
pub fn format_lines<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One path per line
pub fn format_paths(paths: &[PathBuf]) -> String {
    let lines: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format_lines(&lines)
}

/// One-line merge summary
pub fn format_merge_report(report: &MergeReport) -> String {
    let mut output = format!(
        "Merged {} {} into {}",
        report.merged.len(),
        if report.merged.len() == 1 {
            "entry"
        } else {
            "entries"
        },
        report.destination.display()
    );
    if !report.skipped.is_empty() {
        output.push_str(&format!(" ({} skipped)", report.skipped.len()));
    }
    output
}
