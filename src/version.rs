//! Two-component version values for Sku releases.
//!
//! Sku versions its releases as `<major>` or `<major>.<minor>`. There is no
//! patch component and no pre-release syntax, so the full semver grammar does
//! not apply here. This module models exactly that shape with a total
//! ordering on `(major, minor)`.
//!
//! # Examples
//!
//! ```rust
//! use sku_updater::version::Version;
//!
//! let current: Version = "34.26".parse().unwrap();
//! let latest: Version = "35".parse().unwrap();
//! assert!(latest > current);
//! assert_eq!(latest, Version::new(35, 0));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::error::UpdaterError;

/// A Sku release version.
///
/// Immutable once constructed. The minor component defaults to `0` when the
/// source text carries only a major component ("7" parses as `7.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    /// First dot-separated component.
    pub major: u32,
    /// Optional second component, `0` when absent.
    pub minor: u32,
}

impl Version {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for Version {
    type Err = UpdaterError;

    /// Parses `"12"` or `"12.3"`. Any other shape (empty input, more than
    /// two components, or a non-numeric component) is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UpdaterError::InvalidVersion { input: s.to_string() };

        let mut components = s.split('.');
        let major = components
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(invalid)?
            .parse::<u32>()
            .map_err(|_| invalid())?;
        let minor = match components.next() {
            Some(text) => text.parse::<u32>().map_err(|_| invalid())?,
            None => 0,
        };
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { major, minor })
    }
}

impl Ord for Version {
    // Explicit three-way comparison: major first, then minor.
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_minor() {
        assert_eq!("12.3".parse::<Version>().unwrap(), Version::new(12, 3));
        assert_eq!("0.0".parse::<Version>().unwrap(), Version::new(0, 0));
    }

    #[test]
    fn test_parse_minor_defaults_to_zero() {
        assert_eq!("7".parse::<Version>().unwrap(), Version::new(7, 0));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["", ".", "1.", ".2", "1.2.3", "a.b", "12.x", "-1.0", "1,2"] {
            assert!(
                input.parse::<Version>().is_err(),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_is_left_inverse_of_display() {
        for v in [
            Version::new(0, 0),
            Version::new(7, 0),
            Version::new(12, 3),
            Version::new(34, 26),
        ] {
            assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
        }
    }

    #[test]
    fn test_ordering_is_total() {
        let a = Version::new(1, 9);
        let b = Version::new(2, 0);
        assert!(a < b);
        assert!(!(b < a));
        assert_ne!(a, b);

        let c = Version::new(2, 0);
        assert_eq!(b, c);
        assert!(b >= c && b <= c);
    }

    #[test]
    fn test_ordering_is_transitive() {
        let a = Version::new(1, 2);
        let b = Version::new(1, 10);
        let c = Version::new(2, 0);
        assert!(a < b && b < c);
        assert!(a < c);
    }

    #[test]
    fn test_minor_breaks_major_ties() {
        assert!(Version::new(2, 1) > Version::new(2, 0));
        assert!(Version::new(2, 0) < Version::new(2, 1));
    }
}
