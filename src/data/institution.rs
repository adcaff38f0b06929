use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ReadError, Result};
use super::filename::decode_filename;
use super::layout::{DelimitedLayout, RecordParser, TextEncoding};
use super::model::{Column, ExperimentRecord};

// ---------------------------------------------------------------------------
// Export formats of the participating labs
// ---------------------------------------------------------------------------

/// KIT press exports: Latin-1 text, five preamble rows, comma separated,
/// `#` comment lines. Cell 1 holds a channel the benchmark does not use.
pub static KIT_LAYOUT: DelimitedLayout = DelimitedLayout {
    institution: Institution::Kit,
    extension: "txt",
    encoding: TextEncoding::Latin1,
    delimiter: b',',
    header_rows: 5,
    min_fields: 5,
    comment: Some(b'#'),
    columns: &[
        (0, Column::Time),
        (2, Column::Force),
        (3, Column::Displacement),
        (4, Column::Gap),
    ],
};

/// UT exports: one header row, then time, displacement, force and the two
/// LVDT channels (required, but not used).
pub static UT_LAYOUT: DelimitedLayout = DelimitedLayout {
    institution: Institution::Ut,
    extension: "csv",
    encoding: TextEncoding::Utf8,
    delimiter: b',',
    header_rows: 1,
    min_fields: 5,
    comment: None,
    columns: &[
        (0, Column::Time),
        (1, Column::Displacement),
        (2, Column::Force),
    ],
};

// ---------------------------------------------------------------------------
// Institution
// ---------------------------------------------------------------------------

/// A lab contributing raw squeeze-flow data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Institution {
    Kit,
    Ut,
}

impl Institution {
    pub const ALL: [Institution; 2] = [Institution::Kit, Institution::Ut];

    /// Tag used in file names and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            Institution::Kit => "kit",
            Institution::Ut => "ut",
        }
    }

    /// Parser for this lab's export format.
    pub fn parser(self) -> &'static dyn RecordParser {
        match self {
            Institution::Kit => &KIT_LAYOUT,
            Institution::Ut => &UT_LAYOUT,
        }
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Institution {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kit" => Ok(Institution::Kit),
            "ut" => Ok(Institution::Ut),
            _ => Err(ReadError::UnknownInstitution { tag: s.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Directory scan + per-file dispatch
// ---------------------------------------------------------------------------

/// One raw file, parsed.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub material: String,
    pub specimen_number: u32,
    pub record: ExperimentRecord,
}

/// Files in `dir` carrying `institution`'s extension, in `read_dir` order
/// unless `sort_by_name` is set.
pub fn scan_directory(institution: Institution, dir: &Path, sort_by_name: bool) -> Result<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| ReadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let parser = institution.parser();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && parser.accepts(&path) {
            files.push(path);
        }
    }
    if sort_by_name {
        files.sort();
    }
    Ok(files)
}

/// Decode the name of one raw file and parse its contents.
pub fn read_file(institution: Institution, path: &Path) -> Result<ParsedFile> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ReadError::MalformedFilename {
            filename: path.display().to_string(),
        })?;
    let triple = decode_filename(stem)?;
    if !triple.organization.eq_ignore_ascii_case(institution.tag()) {
        log::debug!(
            "{}: organization '{}' differs from institution '{institution}'",
            path.display(),
            triple.organization
        );
    }

    let record = institution.parser().parse(path)?;
    Ok(ParsedFile {
        material: triple.material,
        specimen_number: triple.specimen_number,
        record,
    })
}

/// Parse every matching file of an institution's directory, in scan order.
///
/// Stops at the first failing file.
pub fn read_directory(institution: Institution, dir: &Path) -> Result<Vec<ParsedFile>> {
    scan_directory(institution, dir, false)?
        .iter()
        .map(|path| read_file(institution, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("kit".parse::<Institution>().unwrap(), Institution::Kit);
        assert_eq!("UT".parse::<Institution>().unwrap(), Institution::Ut);
        assert_eq!(" Kit ".parse::<Institution>().unwrap(), Institution::Kit);
    }

    #[test]
    fn unknown_and_reserved_tags_fail() {
        for tag in ["xyz", "tum", ""] {
            match tag.parse::<Institution>() {
                Err(ReadError::UnknownInstitution { tag: t }) => assert_eq!(t, tag),
                other => panic!("expected UnknownInstitution, got {other:?}"),
            }
        }
    }

    #[test]
    fn tag_round_trips() {
        for inst in Institution::ALL {
            assert_eq!(inst.tag().parse::<Institution>().unwrap(), inst);
            assert_eq!(inst.parser().institution(), inst);
        }
    }

    #[test]
    fn declared_vocabularies() {
        assert_eq!(
            Institution::Kit.parser().declared_columns(),
            vec![Column::Time, Column::Force, Column::Displacement, Column::Gap]
        );
        assert_eq!(
            Institution::Ut.parser().declared_columns(),
            vec![Column::Time, Column::Force, Column::Displacement]
        );
        assert_eq!(Institution::Kit.parser().extension(), "txt");
        assert_eq!(Institution::Ut.parser().extension(), "csv");
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Institution::Ut).unwrap();
        assert_eq!(json, "\"ut\"");
        let back: Institution = serde_json::from_str("\"kit\"").unwrap();
        assert_eq!(back, Institution::Kit);
    }
}
