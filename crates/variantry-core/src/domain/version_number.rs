//! Semantic version numbers for component lineages.
//!
//! Parsing is deliberately lenient: stored numbers may have been written by
//! older tooling or by hand, and generation must never fail because of one
//! bad row. A missing major segment reads as `1`, missing minor/patch read
//! as `0`, and any segment that is not an unsigned integer reads as `0`.

use std::cmp::Ordering;
use std::fmt;

/// A parsed `major.minor.patch` triple. Ordered major → minor → patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VersionNumber {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionNumber {
    /// Number assigned to the first version of a lineage.
    pub const INITIAL: VersionNumber = VersionNumber::new(1, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Lenient parse; never fails.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
        let mut parts = raw.split('.');

        let major = parts.next().map_or(1, segment);
        let minor = parts.next().map_or(0, segment);
        let patch = parts.next().map_or(0, segment);

        Self::new(major, minor, patch)
    }

    /// Same major and minor, patch + 1.
    pub const fn bump_patch(self) -> Self {
        Self::new(self.major, self.minor, self.patch.saturating_add(1))
    }
}

fn segment(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

impl Ord for VersionNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for VersionNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compute the next version number for a lineage.
///
/// `existing` holds every stored number of one `(component, framework)`
/// lineage, in any order. With no prior version the answer is `1.0.0`;
/// otherwise the patch of the highest number is incremented. Major and minor
/// are never bumped automatically.
pub fn next_version_number<I, S>(existing: I) -> VersionNumber
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    existing
        .into_iter()
        .map(|s| VersionNumber::parse_lenient(s.as_ref()))
        .max()
        .map_or(VersionNumber::INITIAL, VersionNumber::bump_patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lineage_starts_at_one() {
        let none: [&str; 0] = [];
        assert_eq!(next_version_number(none).to_string(), "1.0.0");
    }

    #[test]
    fn bumps_patch_of_highest() {
        let next = next_version_number(["1.0.0", "1.0.1"]);
        assert_eq!(next.to_string(), "1.0.2");
    }

    #[test]
    fn compares_numerically_not_lexically() {
        let next = next_version_number(["1.0.9", "1.0.10", "1.0.2"]);
        assert_eq!(next.to_string(), "1.0.11");
    }

    #[test]
    fn major_and_minor_dominate_patch() {
        let next = next_version_number(["1.9.99", "2.0.0", "1.10.0"]);
        assert_eq!(next.to_string(), "2.0.1");
    }

    #[test]
    fn never_bumps_minor_or_major() {
        let next = next_version_number(["3.4.5"]);
        assert_eq!(next, VersionNumber::new(3, 4, 6));
    }

    #[test]
    fn malformed_segments_read_as_zero() {
        assert_eq!(VersionNumber::parse_lenient("x.y.z"), VersionNumber::new(0, 0, 0));
        assert_eq!(VersionNumber::parse_lenient("2.beta.3"), VersionNumber::new(2, 0, 3));
        assert_eq!(VersionNumber::parse_lenient(""), VersionNumber::new(0, 0, 0));
        assert_eq!(
            next_version_number(["garbage", "1.0.0"]).to_string(),
            "1.0.1"
        );
    }

    #[test]
    fn missing_segments_use_defaults() {
        assert_eq!(VersionNumber::parse_lenient("2"), VersionNumber::new(2, 0, 0));
        assert_eq!(VersionNumber::parse_lenient("2.3"), VersionNumber::new(2, 3, 0));
        assert_eq!(VersionNumber::parse_lenient("v1.2.3"), VersionNumber::new(1, 2, 3));
    }

    #[test]
    fn result_exceeds_every_existing_number() {
        let existing = ["0.0.1", "1.2.3", "1.2.10", "0.9.9"];
        let next = next_version_number(existing);
        for raw in existing {
            assert!(next > VersionNumber::parse_lenient(raw));
        }
    }
}
