use std::path::PathBuf;

use thiserror::Error;

use super::institution::Institution;

/// Everything that can go wrong while reading an institution's directory.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("File name does not match pattern <org>-<material>-<number>: {filename}")]
    MalformedFilename { filename: String },

    #[error("Unknown institution: '{tag}'")]
    UnknownInstitution { tag: String },

    #[error("Specimen number {number} has no configuration in the {institution} test plan")]
    UnknownConfigurationNumber { institution: Institution, number: u32 },

    #[error("Specimen number {number} is listed under both '{first}' and '{second}'")]
    DuplicateConfigurationNumber {
        number: u32,
        first: String,
        second: String,
    },

    #[error("{institution} record {}, line {line}: {reason}", path.display())]
    RecordParse {
        path: PathBuf,
        institution: Institution,
        line: usize,
        reason: String,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Whether the error concerns a single file, so a batch read may skip it
    /// and carry on.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ReadError::MalformedFilename { .. }
                | ReadError::UnknownConfigurationNumber { .. }
                | ReadError::RecordParse { .. }
                | ReadError::Io { .. }
        )
    }
}

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn record_parse_message_names_file_and_line() {
        let err = ReadError::RecordParse {
            path: PathBuf::from("data/kit-CF5050K-3.txt"),
            institution: Institution::Kit,
            line: 9,
            reason: "'abc' is not a number".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kit-CF5050K-3.txt"));
        assert!(msg.contains("line 9"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn io_error_keeps_source() {
        let err = ReadError::Io {
            path: PathBuf::from("x.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.is_per_file());
    }

    #[test]
    fn directory_errors_are_not_per_file() {
        let err = ReadError::DirectoryNotFound {
            path: PathBuf::from("missing"),
        };
        assert!(!err.is_per_file());
        assert!(!ReadError::UnknownInstitution { tag: "xyz".into() }.is_per_file());
    }
}
