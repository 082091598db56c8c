//! Dotted version ordering
//!
//! Framework bundles name their version directories `A`, `B`, `1.0`, `10.2`
//! and so on. Plain string ordering gets `10.2` vs `9.1` wrong, so versions
//! compare component-wise: numeric components numerically, everything else
//! as strings.

use std::cmp::Ordering;
use std::fmt;

/// A version string with dotted numeric ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    raw: String,
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn components(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.components();
        let mut rhs = other.components();

        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    let ord = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(na), Ok(nb)) => na.cmp(&nb),
                        // numeric components sort below named ones
                        (Ok(_), Err(_)) => Ordering::Less,
                        (Err(_), Ok(_)) => Ordering::Greater,
                        (Err(_), Err(_)) => a.cmp(b),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        simple = { "1.0", "2.0" },
        double_digit = { "1.9", "1.10" },
        string_vs_ten = { "9.1", "10.2" },
        prefix_shorter = { "1.0", "1.0.1" },
        lettered = { "A", "B" },
    )]
    fn test_ordering(lower: &str, higher: &str) {
        assert!(Version::new(lower) < Version::new(higher));
    }

    #[test]
    fn test_equal() {
        assert_eq!(Version::new("1.2.3"), Version::new("1.2.3"));
    }

    #[test]
    fn test_sort_picks_greatest() {
        let mut versions: Vec<Version> = ["1.0", "10.0", "2.0", "9.9"]
            .into_iter()
            .map(Version::new)
            .collect();
        versions.sort();
        assert_eq!(versions.last().unwrap().as_str(), "10.0");
    }
}
