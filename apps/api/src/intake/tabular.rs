//! Tabular parsing: line-based CSV, Excel workbooks via `calamine`.
//!
//! Both paths produce the same shape: the first non-blank row is the header
//! row (trimmed, lower-cased), every following non-blank row becomes a `RawRow`.

use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

use calamine::{DataType, Reader, Xls, Xlsx};

use crate::intake::{FileFormat, IntakeError, RawRow};
use crate::models::student::MAX_STUDENTS;

/// Parses an uploaded file into raw rows, enforcing the row limits.
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> Result<Vec<RawRow>, IntakeError> {
    let format =
        FileFormat::from_file_name(file_name).ok_or_else(|| IntakeError::UnsupportedFileType {
            file_name: file_name.to_string(),
        })?;

    let rows = match format {
        FileFormat::Csv => parse_delimited(bytes)?,
        FileFormat::Xlsx | FileFormat::Xls => parse_workbook(format, bytes)?,
    };

    if rows.is_empty() {
        return Err(IntakeError::EmptyFile);
    }
    if rows.len() > MAX_STUDENTS {
        return Err(IntakeError::TooManyRows { rows: rows.len() });
    }

    Ok(rows)
}

/// Parses comma-delimited UTF-8 text, one line at a time.
///
/// Blank lines are dropped. The first remaining line is the header row.
/// Quoting never spans lines: a `"` anywhere in a data line toggles
/// in-field mode for the rest of that line only. Short rows are padded with
/// empty values, extra trailing values are dropped.
pub fn parse_delimited(bytes: &[u8]) -> Result<Vec<RawRow>, IntakeError> {
    let text = std::str::from_utf8(bytes).map_err(|e| parse_error(FileFormat::Csv, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let headers = match lines.next() {
        Some(line) => normalize_headers(split_header(line)?),
        None => return Ok(Vec::new()),
    };

    Ok(lines
        .map(|line| RawRow::from_positional(&headers, &split_line(line)))
        .collect())
}

/// Splits the header line on every comma. Header cells are never quoted.
fn split_header(line: &str) -> Result<Vec<String>, IntakeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|e| parse_error(FileFormat::Csv, e))?;
    Ok(record.iter().map(str::to_string).collect())
}

/// Splits one data line into trimmed values. Quote characters are dropped;
/// commas between an odd and an even quote belong to the value.
fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}

/// Reads the first worksheet of an `.xlsx` or `.xls` workbook.
pub fn parse_workbook(format: FileFormat, bytes: &[u8]) -> Result<Vec<RawRow>, IntakeError> {
    let cursor = Cursor::new(bytes);
    let grid = match format {
        FileFormat::Xlsx => {
            let workbook = Xlsx::new(cursor).map_err(|e| parse_error(format, e))?;
            first_sheet_grid::<Cursor<&[u8]>, _>(workbook)
        }
        FileFormat::Xls => {
            let workbook = Xls::new(cursor).map_err(|e| parse_error(format, e))?;
            first_sheet_grid::<Cursor<&[u8]>, _>(workbook)
        }
        FileFormat::Csv => return parse_delimited(bytes),
    }
    .map_err(|detail| IntakeError::Parse { format, detail })?;

    let mut grid = grid.into_iter();
    let headers = match grid.next() {
        Some(header_row) => normalize_headers(header_row),
        None => return Ok(Vec::new()),
    };

    Ok(grid
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .map(|values| RawRow::from_positional(&headers, &values))
        .collect())
}

fn first_sheet_grid<RS, R>(mut workbook: R) -> Result<Vec<Vec<String>>, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "workbook does not contain any worksheets".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| format!("worksheet '{sheet_name}' is missing"))?
        .map_err(|e| format!("unable to read worksheet '{sheet_name}': {e}"))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}

fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect()
}

fn parse_error(format: FileFormat, err: impl Display) -> IntakeError {
    IntakeError::Parse {
        format,
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_rows(text: &str) -> Vec<RawRow> {
        parse_delimited(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_headers_trimmed_and_lowercased() {
        let rows = csv_rows(" Student Name , STRENGTH \nAna,Reads well\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("student name"), Some("Ana"));
        assert_eq!(rows[0].get("strength"), Some("Reads well"));
    }

    #[test]
    fn test_quoted_field_keeps_comma() {
        let rows = csv_rows("Name,Strength\n\"Smith, John\",\"Clear, careful writing\"\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Smith, John"));
        assert_eq!(rows[0].get("strength"), Some("Clear, careful writing"));
        assert_eq!(rows[0].cells().len(), 2);
    }

    #[test]
    fn test_unclosed_quote_stays_on_its_line() {
        let rows = csv_rows("Name,Good\n\"Ana,Reads well\nBen,Listens\nCleo,Writes\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("name"), Some("Ana,Reads well"));
        assert_eq!(rows[0].get("good"), Some(""));
        assert_eq!(rows[1].get("name"), Some("Ben"));
        assert_eq!(rows[2].get("good"), Some("Writes"));
    }

    #[test]
    fn test_quote_inside_value_toggles_field_mode() {
        let rows = csv_rows("Name,Good\nAna \"the, reader\",ok\n");
        assert_eq!(rows[0].get("name"), Some("Ana the, reader"));
        assert_eq!(rows[0].get("good"), Some("ok"));
    }

    #[test]
    fn test_unclosed_quotes_count_every_line_against_limit() {
        let mut text = String::from("Name\n");
        for i in 0..=MAX_STUDENTS {
            text.push_str(&format!("\"Student {i}\n"));
        }
        let err = parse_upload("class.csv", text.as_bytes()).unwrap_err();
        assert!(matches!(err, IntakeError::TooManyRows { rows: 51 }));
    }

    #[test]
    fn test_quotes_in_header_are_not_special() {
        let rows = csv_rows("\"Name, first\",Good\nAna,Reads,well\n");
        assert_eq!(rows[0].get("\"name"), Some("Ana"));
        assert_eq!(rows[0].get("first\""), Some("Reads"));
        assert_eq!(rows[0].get("good"), Some("well"));
    }

    #[test]
    fn test_blank_lines_discarded() {
        let rows = csv_rows("Name,Good\n\nAna,Speaks up\n   \n\nBen,Listens\n\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some("Ben"));
    }

    #[test]
    fn test_missing_trailing_values_are_empty() {
        let rows = csv_rows("Name,Good,Bad,Suggestion\nAna,Speaks up\n");
        assert_eq!(rows[0].get("bad"), Some(""));
        assert_eq!(rows[0].get("suggestion"), Some(""));
    }

    #[test]
    fn test_extra_values_ignored() {
        let rows = csv_rows("Name\nAna,stray,values\n");
        assert_eq!(rows[0].cells().len(), 1);
        assert_eq!(rows[0].get("name"), Some("Ana"));
    }

    #[test]
    fn test_crlf_and_bom_handled() {
        let rows = csv_rows("\u{feff}Name,Good\r\nAna,Speaks up\r\n");
        assert_eq!(rows[0].get("name"), Some("Ana"));
        assert_eq!(rows[0].get("good"), Some("Speaks up"));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = parse_delimited(&[0x4e, 0x61, 0xff, 0xfe, 0x0a]).unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Parse {
                format: FileFormat::Csv,
                ..
            }
        ));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let err = parse_upload("class.csv", b"Name,Good\n").unwrap_err();
        assert!(matches!(err, IntakeError::EmptyFile));
    }

    #[test]
    fn test_fifty_rows_accepted() {
        let mut text = String::from("Name\n");
        for i in 0..MAX_STUDENTS {
            text.push_str(&format!("Student {i}\n"));
        }
        let rows = parse_upload("class.csv", text.as_bytes()).unwrap();
        assert_eq!(rows.len(), MAX_STUDENTS);
    }

    #[test]
    fn test_fifty_one_rows_rejected_not_truncated() {
        let mut text = String::from("Name\n");
        for i in 0..=MAX_STUDENTS {
            text.push_str(&format!("Student {i}\n"));
        }
        let err = parse_upload("class.csv", text.as_bytes()).unwrap_err();
        assert!(matches!(err, IntakeError::TooManyRows { rows: 51 }));
    }

    #[test]
    fn test_unsupported_extension_rejected_before_parsing() {
        let err = parse_upload("class.json", &[0xff, 0xff]).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedFileType { .. }));
    }

    #[test]
    fn test_xlsx_first_sheet_decoded() {
        let bytes = include_bytes!("../../tests/fixtures/class.xlsx");
        let rows = parse_upload("Class.XLSX", bytes).unwrap();

        // the blank third row is skipped, the second sheet is never read
        assert_eq!(rows.len(), 2);
        let headers: Vec<&str> = rows[0].cells().iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(headers, vec!["student name", "strength", "weakness"]);
        assert_eq!(rows[0].get("student name"), Some("Ana"));
        assert_eq!(rows[0].get("weakness"), Some("Talks during tasks"));
        assert_eq!(rows[1].get("strength"), Some("Listens well"));
        assert_eq!(rows[1].get("weakness"), Some("7"));
    }

    #[test]
    fn test_xlsx_rows_normalize_to_students() {
        let bytes = include_bytes!("../../tests/fixtures/class.xlsx");
        let students = crate::intake::intake_students("class.xlsx", bytes).unwrap();
        let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben"]);
        assert_eq!(students[0].good, "Reads aloud clearly");
    }

    #[test]
    fn test_garbage_workbook_is_parse_error() {
        let err = parse_upload("class.xlsx", b"definitely not a zip archive").unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Parse {
                format: FileFormat::Xlsx,
                ..
            }
        ));
    }

    #[test]
    fn test_garbage_xls_is_parse_error() {
        let err = parse_upload("class.xls", b"not an ole2 container").unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Parse {
                format: FileFormat::Xls,
                ..
            }
        ));
    }
}
