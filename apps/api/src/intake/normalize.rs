//! Row normalization: maps fuzzy spreadsheet headers onto the `StudentRecord` schema.

use crate::intake::RawRow;
use crate::models::student::StudentRecord;

/// Target field of a recognized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Good,
    Bad,
    Suggestion,
    Extra,
}

/// Header synonyms, checked in order. The first rule with a matching
/// substring claims the column.
const HEADER_RULES: &[(&[&str], StudentField)] = &[
    (&["name"], StudentField::Name),
    (&["good", "strength"], StudentField::Good),
    (&["bad", "weak"], StudentField::Bad),
    (&["suggest"], StudentField::Suggestion),
    (&["extra"], StudentField::Extra),
];

/// Resolves a header to its target field, case-insensitively.
pub fn classify_header(header: &str) -> Option<StudentField> {
    let header = header.trim().to_lowercase();
    HEADER_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| header.contains(n)))
        .map(|&(_, field)| field)
}

/// Builds one candidate record from a row. Later columns overwrite earlier
/// ones that resolve to the same field.
pub fn normalize_row(row: &RawRow) -> StudentRecord {
    let mut record = StudentRecord::default();
    for (header, value) in row.cells() {
        let Some(field) = classify_header(header) else {
            continue;
        };
        let slot = match field {
            StudentField::Name => &mut record.name,
            StudentField::Good => &mut record.good,
            StudentField::Bad => &mut record.bad,
            StudentField::Suggestion => &mut record.suggestion,
            StudentField::Extra => &mut record.extra,
        };
        *slot = value.clone();
    }
    record
}

/// Normalizes every row and drops those without a usable name.
/// Dropped rows are not an error.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<StudentRecord> {
    rows.iter()
        .map(normalize_row)
        .filter(StudentRecord::has_name)
        .collect()
}
