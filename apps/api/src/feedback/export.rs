use crate::models::student::ReportResult;

const REPORT_SEPARATOR: &str = "\n\n---\n\n";

/// Joins all reports into one plain-text document: name, blank line, report,
/// with a `---` rule between students.
pub fn render_combined(reports: &[ReportResult]) -> String {
    reports
        .iter()
        .map(|r| format!("{}\n\n{}", r.name, r.report))
        .collect::<Vec<_>>()
        .join(REPORT_SEPARATOR)
}
