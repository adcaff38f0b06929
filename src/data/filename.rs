use std::sync::LazyLock;

use regex::Regex;

use super::error::{ReadError, Result};

/// `<organization>-<material>-<number>`, anchored at both ends. `\w` is
/// Unicode-aware, so material names like `Glasfaserverstärkt` decode.
static NAMING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)-(\w+)-([0-9]+)$").expect("naming pattern is valid")
});

/// The three fields encoded in an experiment file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTriple {
    pub organization: String,
    pub material: String,
    pub specimen_number: u32,
}

/// Decode a file stem such as `kit-CF5050K-3` into its fields.
///
/// # Errors
///
/// [`ReadError::MalformedFilename`] when the stem does not match the pattern
/// or the number does not fit a `u32`.
pub fn decode_filename(stem: &str) -> Result<FilenameTriple> {
    let malformed = || ReadError::MalformedFilename {
        filename: stem.to_string(),
    };

    let caps = NAMING_PATTERN.captures(stem).ok_or_else(malformed)?;
    let specimen_number = caps[3].parse::<u32>().map_err(|_| malformed())?;

    Ok(FilenameTriple {
        organization: caps[1].to_string(),
        material: caps[2].to_string(),
        specimen_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_stem() {
        let triple = decode_filename("kit-CF5050K-3").unwrap();
        assert_eq!(triple.organization, "kit");
        assert_eq!(triple.material, "CF5050K");
        assert_eq!(triple.specimen_number, 3);
    }

    #[test]
    fn underscores_are_word_characters() {
        let triple = decode_filename("ut_w-CF_60-012").unwrap();
        assert_eq!(triple.organization, "ut_w");
        assert_eq!(triple.material, "CF_60");
        assert_eq!(triple.specimen_number, 12);
    }

    #[test]
    fn rejects_malformed_stems() {
        for stem in [
            "",
            "kit-CF5050K",
            "kit--3",
            "-CF5050K-3",
            "kit-CF5050K-",
            "kit-CF5050K-x3",
            "kit-CF-5050K-3",
            "kit-CF5050K-3 copy",
            "kit CF5050K 3",
            "kit-CF5050K-99999999999",
        ] {
            match decode_filename(stem) {
                Err(ReadError::MalformedFilename { filename }) => assert_eq!(filename, stem),
                other => panic!("expected MalformedFilename for {stem:?}, got {other:?}"),
            }
        }
    }
}
