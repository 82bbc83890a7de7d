//! Version metadata attached to controllers

use crate::error::{Result, VersioningError};
use crate::version::ApiVersion;

/// The set of API versions a controller (and therefore its actions) belongs to
///
/// Declared versions are kept in declaration order so that every expansion
/// driven by this model is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionModel {
    declared: Vec<ApiVersion>,
    neutral: bool,
}

impl VersionModel {
    /// Create a model from declared versions
    ///
    /// Duplicates are dropped, keeping the first declaration.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::EmptyVersionSet`] when no version is given.
    pub fn new(versions: impl IntoIterator<Item = ApiVersion>) -> Result<Self> {
        let mut declared: Vec<ApiVersion> = Vec::new();
        for version in versions {
            if !declared.contains(&version) {
                declared.push(version);
            }
        }

        if declared.is_empty() {
            return Err(VersioningError::EmptyVersionSet);
        }

        Ok(Self {
            declared,
            neutral: false,
        })
    }

    /// Parse a model from version strings
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::InvalidVersionFormat`] for the first
    /// unparsable string, or [`VersioningError::EmptyVersionSet`].
    pub fn parse<'a>(versions: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let parsed = versions
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<ApiVersion>>>()?;
        Self::new(parsed)
    }

    /// A model for actions that are not subject to versioning
    pub fn neutral() -> Self {
        Self {
            declared: Vec::new(),
            neutral: true,
        }
    }

    /// Declared versions in declaration order
    pub fn declared(&self) -> &[ApiVersion] {
        &self.declared
    }

    /// Whether the owning controller is version-neutral
    pub fn is_neutral(&self) -> bool {
        self.neutral
    }

    /// Whether `version` is declared exactly
    pub fn declares(&self, version: &ApiVersion) -> bool {
        self.declared.contains(version)
    }

    /// Whether a version equivalent to `version` is declared (`3` matches `3.0`)
    pub fn declares_equivalent(&self, version: &ApiVersion) -> bool {
        self.declared.iter().any(|v| v.is_equivalent_to(version))
    }

    /// Append a version, keeping the model non-neutral
    pub(crate) fn push(&mut self, version: ApiVersion) {
        self.neutral = false;
        if !self.declared.contains(&version) {
            self.declared.push(version);
        }
    }
}

impl Default for VersionModel {
    fn default() -> Self {
        Self::neutral()
    }
}
