use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// An OCFL version name: `v` followed by a positive integer, optionally
/// zero padded (`v1`, `v2`, ... or `v001`, `v002`, ...).
///
/// Ordering is numeric for well-formed names, so `v9 < v10`. Malformed names
/// sort after every well-formed one and among themselves lexically.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Wrap a version name without checking it.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse a version name, failing if it is not well formed.
    pub fn parse(name: &str) -> TypeResult<Self> {
        let id = Self::new(name);
        id.number()?;
        Ok(id)
    }

    /// The first version of every object, `v1`.
    pub fn first() -> Self {
        Self::new("v1")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is `v` followed by a positive integer.
    pub fn is_valid(&self) -> bool {
        self.number().is_ok()
    }

    /// The integer value of this version.
    pub fn number(&self) -> TypeResult<u64> {
        let digits = self
            .0
            .strip_prefix('v')
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| TypeError::InvalidVersion(self.0.clone()))?;

        match digits.parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(TypeError::InvalidVersion(self.0.clone())),
        }
    }

    /// Width of the digit field when the name is zero padded (`v003` is 3).
    /// `None` for unpadded names.
    pub fn padding(&self) -> Option<usize> {
        let digits = self.0.strip_prefix('v')?;
        if digits.len() > 1 && digits.starts_with('0') {
            Some(digits.len())
        } else {
            None
        }
    }

    /// The next version name, preserving zero padding.
    ///
    /// ```
    /// use ocfl_types::VersionId;
    ///
    /// assert_eq!(VersionId::new("v9").increment().unwrap().as_str(), "v10");
    /// assert_eq!(VersionId::new("v009").increment().unwrap().as_str(), "v010");
    /// assert!(VersionId::new("v0").increment().is_err());
    /// ```
    pub fn increment(&self) -> TypeResult<Self> {
        let next = self
            .number()?
            .checked_add(1)
            .ok_or_else(|| TypeError::PaddingOverflow(self.0.clone()))?;
        Self::from_number(next, self.padding())
    }

    /// Build the name of version `n`, zero padded to `padding` digits.
    pub fn from_number(n: u64, padding: Option<usize>) -> TypeResult<Self> {
        if n == 0 {
            return Err(TypeError::InvalidVersion("v0".into()));
        }
        match padding {
            Some(width) => {
                let name = format!("v{n:0width$}");
                if name.len() - 1 > width {
                    return Err(TypeError::PaddingOverflow(name));
                }
                Ok(Self(name))
            }
            None => Ok(Self(format!("v{n}"))),
        }
    }
}

impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.number().ok(), other.number().ok()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for VersionId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for VersionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VersionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VersionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
