use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

// ════════════════════════════════════════════════════════════════
//  Version
// ════════════════════════════════════════════════════════════════

/// Protocol version of a node: `major.minor.revision`.
///
/// Ordering is purely structural (field order of the struct). The version a
/// stream was written for is negotiated out-of-band and passed explicitly to
/// every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

/// Build component of every release id.
const RELEASE_BUILD: i32 = 99;
/// Largest minor or revision that fits its two id digits.
const MAX_ID_COMPONENT: u8 = 99;

impl Version {
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Numeric wire id: `MMmmrrbb` with `bb = 99` for release builds.
    ///
    /// Minor and revision get two decimal digits each; anything wider would
    /// carry into the next component.
    pub fn id(&self) -> Result<i32, VersionError> {
        if self.minor > MAX_ID_COMPONENT || self.revision > MAX_ID_COMPONENT {
            return Err(VersionError::Unencodable(*self));
        }
        Ok(self.major as i32 * 1_000_000
            + self.minor as i32 * 10_000
            + self.revision as i32 * 100
            + RELEASE_BUILD)
    }

    /// Inverse of [`id`](Self::id). Only release ids are accepted.
    pub fn from_id(id: i32) -> Result<Self, VersionError> {
        if id < 0 || id % 100 != RELEASE_BUILD {
            return Err(VersionError::InvalidId(id));
        }
        let major = u8::try_from(id / 1_000_000).map_err(|_| VersionError::InvalidId(id))?;
        let minor = ((id / 10_000) % 100) as u8;
        let revision = ((id / 100) % 100) as u8;
        Ok(Self::new(major, minor, revision))
    }

    pub fn on_or_after(self, threshold: Version) -> bool {
        self >= threshold
    }

    pub fn before(self, threshold: Version) -> bool {
        self < threshold
    }

    /// `low <= self < high`.
    pub fn between(self, low: Version, high: Version) -> bool {
        self >= low && self < high
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| VersionError::Format {
            input: s.to_string(),
            reason,
        };
        let mut parts = [0u8; 3];
        let mut count = 0;
        for part in s.split('.') {
            if count == parts.len() {
                return Err(err("expected exactly three components"));
            }
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err("components must be decimal numbers"));
            }
            parts[count] = part.parse().map_err(|_| err("component out of range"))?;
            count += 1;
        }
        if count != parts.len() {
            return Err(err("expected exactly three components"));
        }
        if parts[1] > MAX_ID_COMPONENT || parts[2] > MAX_ID_COMPONENT {
            return Err(err("minor and revision must be at most 99"));
        }
        Ok(Version::new(parts[0], parts[1], parts[2]))
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ════════════════════════════════════════════════════════════════
//  VersionRange
// ════════════════════════════════════════════════════════════════

/// Versions in which a field exists in one particular shape.
///
/// `min` is inclusive, `max` exclusive; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Option<Version>,
    pub max: Option<Version>,
}

impl VersionRange {
    pub const fn always() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn since(min: Version) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn until(max: Version) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: Version, max: Version) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, version: Version) -> bool {
        self.min.is_none_or(|min| version >= min) && self.max.is_none_or(|max| version < max)
    }

    /// No version can satisfy the range.
    pub fn is_empty(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min >= max)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        let low = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let high = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        match (low, high) {
            (Some(low), Some(high)) => low < high,
            _ => true,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("always"),
            (Some(min), None) => write!(f, "since {min}"),
            (None, Some(max)) => write!(f, "until {max}"),
            (Some(min), Some(max)) => write!(f, "{min}..{max}"),
        }
    }
}
