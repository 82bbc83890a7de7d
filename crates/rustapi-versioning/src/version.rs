//! API Version type and parsing
//!
//! Versions are written as `<major>.<minor>` with either component optional
//! and an optional trailing status label, e.g. `1`, `1.0`, `.5`, `3.0-beta`.

use crate::error::{Result, VersioningError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// API version with optional major, minor and status components
///
/// Supports formats like:
/// - `1`, `v1` (major only)
/// - `1.0`, `v1.2` (major.minor)
/// - `.5` (minor only, rendered as `0.5`)
/// - `3.0-beta`, `2-rc1` (with status label)
///
/// Ordering compares `major`, then `minor`, then `status`. Within each field
/// a missing component sorts before a present one, so `3 < 3.0 < 3.0-beta`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    /// Major version number
    pub major: Option<u32>,
    /// Minor version number
    pub minor: Option<u32>,
    /// Status label (e.g. "beta")
    pub status: Option<String>,
}

/// Rendering style for version strings in paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionFormat {
    /// `<major>.<minor>`, e.g. `3.0`
    #[default]
    Long,
    /// Minor omitted when zero, e.g. `3`
    ShortHand,
}

impl ApiVersion {
    /// Create a new `major.minor` version
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            status: None,
        }
    }

    /// Create a version with only a major number
    pub fn major(major: u32) -> Self {
        Self {
            major: Some(major),
            minor: None,
            status: None,
        }
    }

    /// Create a version with only a minor number
    pub fn minor(minor: u32) -> Self {
        Self {
            major: None,
            minor: Some(minor),
            status: None,
        }
    }

    /// Attach a status label
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Parse a version string
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::InvalidVersionFormat`] when the string has
    /// neither a major nor a minor component, more than two numeric
    /// components, a non-numeric component, or a malformed status label.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Check whether two versions denote the same API version once missing
    /// numeric components are read as zero (`3` is equivalent to `3.0`)
    pub fn is_equivalent_to(&self, other: &ApiVersion) -> bool {
        self.major.unwrap_or(0) == other.major.unwrap_or(0)
            && self.minor.unwrap_or(0) == other.minor.unwrap_or(0)
            && self.status == other.status
    }

    /// Render the version in the given format
    pub fn format(&self, format: VersionFormat) -> String {
        match format {
            VersionFormat::Long => self.to_long_string(),
            VersionFormat::ShortHand => self.to_short_hand_string(),
        }
    }

    /// Long form: `major.minor`, `major` when minor is absent, `0.minor` when
    /// major is absent
    pub fn to_long_string(&self) -> String {
        let mut text = match (self.major, self.minor) {
            (Some(major), Some(minor)) => format!("{major}.{minor}"),
            (Some(major), None) => major.to_string(),
            (None, Some(minor)) => format!("0.{minor}"),
            (None, None) => String::new(),
        };
        self.push_status(&mut text);
        text
    }

    /// Short-hand form: the minor component is only written when it is
    /// non-zero, `0.minor` when major is absent
    pub fn to_short_hand_string(&self) -> String {
        let mut text = match (self.major, self.minor) {
            (Some(major), Some(minor)) if minor != 0 => format!("{major}.{minor}"),
            (Some(major), _) => major.to_string(),
            (None, Some(minor)) => format!("0.{minor}"),
            (None, None) => String::new(),
        };
        self.push_status(&mut text);
        text
    }

    fn push_status(&self, text: &mut String) {
        if let Some(status) = &self.status {
            text.push('-');
            text.push_str(status);
        }
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_string())
    }
}

impl FromStr for ApiVersion {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || VersioningError::InvalidVersionFormat(s.to_string());

        // Remove optional 'v' prefix
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (numbers, status) = match body.split_once('-') {
            Some((numbers, status)) => (numbers, Some(status)),
            None => (body, None),
        };

        if let Some(status) = status {
            let valid = !status.is_empty()
                && status.chars().all(|c| c.is_ascii_alphanumeric())
                && !status.chars().all(|c| c.is_ascii_digit());
            if !valid {
                return Err(invalid());
            }
        }

        let component = |part: &str| -> Result<Option<u32>> {
            if part.is_empty() {
                Ok(None)
            } else if part.chars().all(|c| c.is_ascii_digit()) {
                part.parse().map(Some).map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        let (major, minor) = match parts.as_slice() {
            [major] => (component(major)?, None),
            [major, minor] => {
                // "1." is not a version; ".5" is (minor only)
                if minor.is_empty() {
                    return Err(invalid());
                }
                (component(major)?, component(minor)?)
            }
            _ => return Err(invalid()),
        };

        if major.is_none() && minor.is_none() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            status: status.map(str::to_string),
        })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = VersioningError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.to_long_string()
    }
}
