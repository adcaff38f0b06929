use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use super::error::{ReadError, Result};
use super::institution::Institution;
use super::model::{Column, ExperimentRecord};

// ---------------------------------------------------------------------------
// RecordParser – "parse one raw file into an ExperimentRecord"
// ---------------------------------------------------------------------------

/// A raw-file format that can be turned into an [`ExperimentRecord`].
pub trait RecordParser: Send + Sync {
    /// Institution whose export format this is.
    fn institution(&self) -> Institution;

    /// Expected file extension, without the dot, lower case.
    fn extension(&self) -> &'static str;

    /// Columns every successfully parsed record carries, in vocabulary order.
    fn declared_columns(&self) -> Vec<Column>;

    /// Parse a single raw file.
    fn parse(&self, path: &Path) -> Result<ExperimentRecord>;

    /// Whether `path` carries this format's extension (case-insensitive).
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension()))
    }
}

/// Text encoding of a raw export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte is one code point.
    Latin1,
}

// ---------------------------------------------------------------------------
// DelimitedLayout – fixed-offset delimited text exports
// ---------------------------------------------------------------------------

/// Column layout of a delimited text export written by test-rig software.
///
/// The layout is fixed by the hardware vendor: a number of preamble rows
/// precede the data, and each data row carries at least `min_fields` cells
/// of which only the ones listed in `columns` are kept.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedLayout {
    pub institution: Institution,
    pub extension: &'static str,
    pub encoding: TextEncoding,
    pub delimiter: u8,
    pub header_rows: usize,
    pub min_fields: usize,
    /// Data lines starting with this byte are skipped like blank lines.
    pub comment: Option<u8>,
    /// Source cell index → column.
    pub columns: &'static [(usize, Column)],
}

impl DelimitedLayout {
    fn parse_error(&self, path: &Path, line: usize, reason: impl Into<String>) -> ReadError {
        ReadError::RecordParse {
            path: path.to_path_buf(),
            institution: self.institution,
            line,
            reason: reason.into(),
        }
    }

    fn decode(&self, path: &Path, bytes: Vec<u8>) -> Result<String> {
        match self.encoding {
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
                let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
                let line = count_line_ends(valid) + 1;
                self.parse_error(path, line, "invalid UTF-8")
            }),
        }
    }

    /// Parse already decoded file contents.
    pub fn parse_text(&self, path: &Path, text: &str) -> Result<ExperimentRecord> {
        let text = normalize_line_endings(text);

        // Byte offset of the first data row, after the preamble.
        let data_start: usize = text
            .split_inclusive('\n')
            .take(self.header_rows)
            .map(str::len)
            .sum();
        let data = text.get(data_start..).unwrap_or("");

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(self.comment)
            .delimiter(self.delimiter)
            .from_reader(data.as_bytes());

        let mut series: Vec<Vec<f64>> = vec![Vec::new(); self.columns.len()];

        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map_or(0, |p| p.line() as usize);
                self.parse_error(path, self.header_rows + line, e.to_string())
            })?;
            let line = self.header_rows + record.position().map_or(0, |p| p.line() as usize);

            // Whitespace-only rows are blank lines as far as the rig is concerned.
            if record.iter().all(str::is_empty) {
                continue;
            }

            if record.len() < self.min_fields {
                return Err(self.parse_error(
                    path,
                    line,
                    format!(
                        "expected at least {} columns, found {}",
                        self.min_fields,
                        record.len()
                    ),
                ));
            }

            for (values, &(idx, column)) in series.iter_mut().zip(self.columns) {
                let cell = record.get(idx).unwrap_or("");
                let value = cell.parse::<f64>().map_err(|_| {
                    self.parse_error(path, line, format!("{column}: '{cell}' is not a number"))
                })?;
                values.push(value);
            }
        }

        if series.first().map_or(true, Vec::is_empty) {
            return Err(self.parse_error(path, self.header_rows + 1, "no data rows"));
        }

        let columns: BTreeMap<Column, Vec<f64>> = self
            .columns
            .iter()
            .map(|&(_, column)| column)
            .zip(series)
            .collect();

        ExperimentRecord::from_columns(path, columns)
            .ok_or_else(|| self.parse_error(path, 0, "columns differ in length"))
    }
}

/// Rewrite `\r\n` and bare `\r` line ends as `\n`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Line ends in `bytes`, counting `\r\n`, `\n` and bare `\r` once each.
fn count_line_ends(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n')))
        .count()
}

impl RecordParser for DelimitedLayout {
    fn institution(&self) -> Institution {
        self.institution
    }

    fn extension(&self) -> &'static str {
        self.extension
    }

    fn declared_columns(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self.columns.iter().map(|&(_, c)| c).collect();
        columns.sort();
        columns
    }

    fn parse(&self, path: &Path) -> Result<ExperimentRecord> {
        let bytes = std::fs::read(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = self.decode(path, bytes)?;
        self.parse_text(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: DelimitedLayout = DelimitedLayout {
        institution: Institution::Kit,
        extension: "txt",
        encoding: TextEncoding::Latin1,
        delimiter: b',',
        header_rows: 2,
        min_fields: 3,
        comment: Some(b'#'),
        columns: &[(0, Column::Time), (2, Column::Force)],
    };

    fn parse(text: &str) -> Result<ExperimentRecord> {
        LAYOUT.parse_text(Path::new("kit-A-1.txt"), text)
    }

    #[test]
    fn skips_preamble_and_picks_columns() {
        let rec = parse("Header\nUnits\n0.0, 9, 1.5\n0.1, 9, 2.5\n").unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.column(Column::Time), Some(&[0.0, 0.1][..]));
        assert_eq!(rec.column(Column::Force), Some(&[1.5, 2.5][..]));
        assert_eq!(rec.column_names(), vec!["t", "F"]);
    }

    #[test]
    fn preamble_may_contain_delimiters_and_garbage() {
        let rec = parse("a,b,c,d,e,f\n\"unterminated\n1,2,3\n").unwrap();
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let rec = parse("h\nu\n1,2,3\n\n   \n4,5,6\r\n").unwrap();
        assert_eq!(rec.column(Column::Force), Some(&[3.0, 6.0][..]));
    }

    #[test]
    fn carriage_return_line_endings() {
        let rec = parse("Header\rUnits\r0.0,9,1.5\r0.1,9,2.5\r").unwrap();
        assert_eq!(rec.column(Column::Force), Some(&[1.5, 2.5][..]));

        let rec = parse("Header\r\nUnits\r\n0.0,9,1.5\r\n0.1,9,2.5\r\n").unwrap();
        assert_eq!(rec.len(), 2);

        match parse("h\ru\r1,2,3\r4,5\r").unwrap_err() {
            ReadError::RecordParse { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn comment_lines_are_ignored() {
        let rec = parse("h\nu\n# start\n1,2,3\n#4,5,6\n7,8,9\n# end of test\n").unwrap();
        assert_eq!(rec.column(Column::Time), Some(&[1.0, 7.0][..]));

        let strict = DelimitedLayout {
            comment: None,
            ..LAYOUT
        };
        let err = strict
            .parse_text(Path::new("x.txt"), "h\nu\n1,2,3\n# end\n")
            .unwrap_err();
        assert!(matches!(err, ReadError::RecordParse { line: 4, .. }));
    }

    #[test]
    fn line_ends_are_counted_once() {
        assert_eq!(count_line_ends(b"a\r\nb\nc\rd"), 3);
        assert_eq!(count_line_ends(b"abc"), 0);
    }

    #[test]
    fn short_row_reports_its_line() {
        let err = parse("h\nu\n1,2,3\n4,5\n").unwrap_err();
        match err {
            ReadError::RecordParse { line, reason, .. } => {
                assert_eq!(line, 4);
                assert!(reason.contains("at least 3"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_rejected() {
        let err = parse("h\nu\n1,2,abc\n").unwrap_err();
        match err {
            ReadError::RecordParse { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_data_block_is_an_error() {
        assert!(matches!(parse("h\nu\n"), Err(ReadError::RecordParse { .. })));
        assert!(matches!(parse(""), Err(ReadError::RecordParse { .. })));
    }

    #[test]
    fn latin1_preamble_decodes() {
        let text = LAYOUT
            .decode(Path::new("x.txt"), b"Temp \xb0C\nu\n1,2,3\n".to_vec())
            .unwrap();
        assert!(text.starts_with("Temp °C"));
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let layout = DelimitedLayout {
            encoding: TextEncoding::Utf8,
            ..LAYOUT
        };
        let err = layout
            .decode(Path::new("x.csv"), b"ok\nok\n1,\xff,3\n".to_vec())
            .unwrap_err();
        assert!(matches!(err, ReadError::RecordParse { line: 3, .. }));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(LAYOUT.accepts(Path::new("dir/kit-A-1.TXT")));
        assert!(LAYOUT.accepts(Path::new("kit-A-1.txt")));
        assert!(!LAYOUT.accepts(Path::new("kit-A-1.csv")));
        assert!(!LAYOUT.accepts(Path::new("txt")));
    }
}
