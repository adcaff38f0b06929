use std::collections::BTreeMap;
use std::fmt;

use super::error::{ReadError, Result};
use super::institution::Institution;

// ---------------------------------------------------------------------------
// ConfigurationLabel
// ---------------------------------------------------------------------------

/// Mold gap and specimen size of a test, e.g. `"3mm 100x100"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigurationLabel(String);

impl ConfigurationLabel {
    pub fn new(label: impl Into<String>) -> Self {
        ConfigurationLabel(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ConfigurationLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ConfigurationLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Benchmark test plan
// ---------------------------------------------------------------------------

pub const CONFIG_3MM_100: &str = "3mm 100x100";
pub const CONFIG_3MM_50: &str = "3mm 50x50";
pub const CONFIG_5MM_100: &str = "5mm 100x100";
pub const CONFIG_7MM_100: &str = "7mm 100x100";

/// Specimen numbers per configuration in the benchmark test plan.
/// Each day of the plan cycles through the four configurations.
pub const BENCHMARK_PLAN: &[(&str, &[u32])] = &[
    (CONFIG_3MM_100, &[3, 7, 11, 15, 19, 23]),
    (CONFIG_3MM_50, &[4, 8, 12, 16, 20, 24]),
    (CONFIG_5MM_100, &[2, 6, 10, 14, 18, 22]),
    (CONFIG_7MM_100, &[1, 5, 9, 13, 17, 21]),
];

// ---------------------------------------------------------------------------
// ConfigurationTable – number → label for one institution
// ---------------------------------------------------------------------------

/// Immutable lookup from specimen number to configuration label.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationTable {
    by_number: BTreeMap<u32, ConfigurationLabel>,
}

impl ConfigurationTable {
    /// Build a table from `(label, numbers)` groups.
    ///
    /// # Errors
    ///
    /// [`ReadError::DuplicateConfigurationNumber`] if a number is listed under
    /// two different labels. Repeating a number under the same label is
    /// harmless and accepted.
    pub fn from_groups(groups: &[(&str, &[u32])]) -> Result<Self> {
        let mut by_number: BTreeMap<u32, ConfigurationLabel> = BTreeMap::new();
        for &(label, numbers) in groups {
            for &number in numbers {
                if let Some(existing) = by_number.get(&number) {
                    if existing != label {
                        return Err(ReadError::DuplicateConfigurationNumber {
                            number,
                            first: existing.to_string(),
                            second: label.to_string(),
                        });
                    }
                    continue;
                }
                by_number.insert(number, ConfigurationLabel::new(label));
            }
        }
        Ok(ConfigurationTable { by_number })
    }

    pub fn get(&self, number: u32) -> Option<&ConfigurationLabel> {
        self.by_number.get(&number)
    }

    /// Number of specimen numbers covered.
    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ConfigurationResolver – one table per institution
// ---------------------------------------------------------------------------

/// Resolves specimen numbers to configuration labels, per institution.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    kit: ConfigurationTable,
    ut: ConfigurationTable,
}

impl ConfigurationResolver {
    /// Resolver with explicit tables.
    pub fn new(kit: ConfigurationTable, ut: ConfigurationTable) -> Self {
        ConfigurationResolver { kit, ut }
    }

    /// Resolver for the benchmark test plan, shared by all institutions.
    pub fn standard() -> Result<Self> {
        let plan = ConfigurationTable::from_groups(BENCHMARK_PLAN)?;
        Ok(ConfigurationResolver::new(plan.clone(), plan))
    }

    pub fn table(&self, institution: Institution) -> &ConfigurationTable {
        match institution {
            Institution::Kit => &self.kit,
            Institution::Ut => &self.ut,
        }
    }

    /// Look up the label of `number` in `institution`'s table.
    ///
    /// # Errors
    ///
    /// [`ReadError::UnknownConfigurationNumber`] when the number is absent.
    pub fn resolve(&self, institution: Institution, number: u32) -> Result<&ConfigurationLabel> {
        self.table(institution)
            .get(number)
            .ok_or(ReadError::UnknownConfigurationNumber {
                institution,
                number,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_plan_resolves_every_listed_number() {
        let resolver = ConfigurationResolver::standard().unwrap();
        for &(label, numbers) in BENCHMARK_PLAN {
            for &n in numbers {
                assert_eq!(resolver.resolve(Institution::Kit, n).unwrap(), label);
                assert_eq!(resolver.resolve(Institution::Ut, n).unwrap(), label);
            }
        }
        assert_eq!(resolver.table(Institution::Kit).len(), 24);
    }

    #[test]
    fn shared_label_for_several_numbers() {
        let resolver = ConfigurationResolver::standard().unwrap();
        assert_eq!(resolver.resolve(Institution::Kit, 3).unwrap(), "3mm 100x100");
        assert_eq!(resolver.resolve(Institution::Kit, 7).unwrap(), "3mm 100x100");
        assert_eq!(resolver.resolve(Institution::Kit, 1).unwrap(), "7mm 100x100");
    }

    #[test]
    fn unknown_number_fails_loudly() {
        let resolver = ConfigurationResolver::standard().unwrap();
        for n in [0, 25, 100] {
            match resolver.resolve(Institution::Kit, n) {
                Err(ReadError::UnknownConfigurationNumber { institution, number }) => {
                    assert_eq!(institution, Institution::Kit);
                    assert_eq!(number, n);
                }
                other => panic!("expected UnknownConfigurationNumber, got {other:?}"),
            }
        }
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let err = ConfigurationTable::from_groups(&[("a", &[1, 2]), ("b", &[2, 3])]).unwrap_err();
        match err {
            ReadError::DuplicateConfigurationNumber { number, first, second } => {
                assert_eq!(number, 2);
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn per_institution_tables_are_independent() {
        let kit = ConfigurationTable::from_groups(&[("kit only", &[1])]).unwrap();
        let ut = ConfigurationTable::from_groups(&[("ut only", &[2])]).unwrap();
        let resolver = ConfigurationResolver::new(kit, ut);
        assert_eq!(resolver.resolve(Institution::Kit, 1).unwrap(), "kit only");
        assert!(resolver.resolve(Institution::Kit, 2).is_err());
        assert_eq!(resolver.resolve(Institution::Ut, 2).unwrap(), "ut only");
    }
}
