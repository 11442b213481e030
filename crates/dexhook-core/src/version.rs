//! # Dotted Schema Versions
//!
//! Metadata and schema versions are written as dot-separated base-10
//! integers (`"1.0"`, `"1.02.4"`). Comparison is numeric per component,
//! left to right, never lexicographic on the string:
//!
//! - `"1.2" == "1.02"`: leading zeros do not matter.
//! - `"1.2" <  "1.20"`: components are whole numbers, not decimals.
//! - `" 1. 3 " == "1.3"`: whitespace around components is ignored.
//!
//! Missing trailing components count as zero, so `"2" == "2.0"`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::VersionParseError;

/// A parsed dotted version.
///
/// Equality, ordering and hashing look only at the numeric components; the
/// original text is kept for display and reports.
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    raw: String,
    /// Components with trailing zeros removed.
    components: Vec<u64>,
}

impl SchemaVersion {
    /// Parse a dotted version string.
    pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
        if raw.trim().is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut components = raw
            .split('.')
            .map(|part| {
                let part = part.trim();
                part.parse::<u64>()
                    .map_err(|_| VersionParseError::NonNumeric {
                        version: raw.to_string(),
                        component: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        while components.last() == Some(&0) {
            components.pop();
        }

        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    /// First component; `0` for an all-zero version.
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or(0)
    }

    /// The version text as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for SchemaVersion {}

impl std::hash::Hash for SchemaVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        (0..width)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn components() -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(0u64..1000, 1..5)
    }

    fn render(parts: &[u64]) -> String {
        parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    fn pad(parts: &[u64], width: usize) -> Vec<u64> {
        let mut out = parts.to_vec();
        out.resize(width, 0);
        out
    }

    proptest! {
        /// Ordering agrees with component-wise numeric comparison.
        #[test]
        fn ordering_matches_componentwise(a in components(), b in components()) {
            let width = a.len().max(b.len());
            let expected = pad(&a, width).cmp(&pad(&b, width));
            let actual = v_of(&a).cmp(&v_of(&b));
            prop_assert_eq!(actual, expected);
        }

        /// Zero-padding a component never changes its value.
        #[test]
        fn zero_padding_preserves_value(parts in components(), zeros in 0usize..3) {
            let padded: Vec<String> = parts
                .iter()
                .map(|n| format!("{}{}", "0".repeat(zeros), n))
                .collect();
            let padded = SchemaVersion::parse(&padded.join(".")).unwrap();
            prop_assert_eq!(padded, v_of(&parts));
        }
    }

    fn v_of(parts: &[u64]) -> SchemaVersion {
        SchemaVersion::parse(&render(parts)).unwrap()
    }
}
