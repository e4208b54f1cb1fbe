//! Student intake: turns an uploaded spreadsheet into normalized `StudentRecord`s.
//!
//! Flow: file name + bytes → `tabular::parse_upload` → `RawRow`s →
//!       `normalize::normalize_rows` → `StudentRecord`s.

pub mod handlers;
pub mod normalize;
pub mod tabular;

use std::fmt;

use thiserror::Error;

use crate::models::student::{StudentRecord, MAX_STUDENTS};

/// Upload formats accepted by the intake endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.trim().to_lowercase();
        if lower.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(FileFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Some(FileFormat::Xls)
        } else {
            None
        }
    }

    pub fn is_workbook(self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => f.write_str("csv"),
            FileFormat::Xlsx => f.write_str("xlsx"),
            FileFormat::Xls => f.write_str("xls"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unsupported file type: {file_name}")]
    UnsupportedFileType { file_name: String },

    #[error("could not parse {format} file: {detail}")]
    Parse { format: FileFormat, detail: String },

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("file contains {rows} data rows (max {max})", max = MAX_STUDENTS)]
    TooManyRows { rows: usize },

    #[error("no row has a non-empty name")]
    NoValidNames,
}

impl IntakeError {
    /// The message shown to the teacher. Parse details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::UnsupportedFileType { .. } => {
                "Please upload a CSV or Excel file (.csv, .xlsx, .xls)".to_string()
            }
            IntakeError::Parse { format, .. } => {
                if format.is_workbook() {
                    "Could not read Excel file. Please check the format.".to_string()
                } else {
                    "Could not read CSV file. Please check the format.".to_string()
                }
            }
            IntakeError::EmptyFile => "The file appears to be empty.".to_string(),
            IntakeError::TooManyRows { .. } => format!(
                "Maximum {MAX_STUDENTS} students allowed. Please reduce the number of rows."
            ),
            IntakeError::NoValidNames => {
                "No valid student names found. Make sure you have a \"Name\" column.".to_string()
            }
        }
    }
}

/// One data row of an uploaded sheet: `(lower-cased header, cell value)` pairs
/// in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Pairs each header with its positional value; missing values become "".
    pub fn from_positional(headers: &[String], values: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = values.get(idx).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self::new(cells)
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    /// Value under `header`; the last column wins when headers repeat.
    #[cfg(test)]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .rev()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses an upload and normalizes it, rejecting files with no usable names.
pub fn intake_students(file_name: &str, bytes: &[u8]) -> Result<Vec<StudentRecord>, IntakeError> {
    let rows = tabular::parse_upload(file_name, bytes)?;
    let students = normalize::normalize_rows(&rows);
    if students.is_empty() {
        return Err(IntakeError::NoValidNames);
    }
    Ok(students)
}
