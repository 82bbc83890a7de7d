//! Versioning configuration
//!
//! [`ApiVersioningOptions`] carries every recognized setting: the URL
//! versioning options used by route expansion and the explorer options used
//! by description expansion. With the `config` feature, options can be read
//! from `API_VERSIONING_*` environment variables.
//!
//! # Example
//!
//! ```rust
//! use rustapi_versioning::{ApiVersion, ApiVersioningOptions};
//!
//! let options = ApiVersioningOptions::new()
//!     .default_api_version(ApiVersion::new(3, 0))
//!     .include_default_version(false)
//!     .prefer_short_hand_version(true);
//!
//! assert!(options.url.assume_default_version_when_unspecified);
//! assert!(!options.explorer.include_default_version);
//! ```

use crate::constraint::{DefaultConstraintResolver, InlineConstraintResolver};
use crate::version::{ApiVersion, VersionFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options of the version-aware API explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerOptions {
    /// Keep descriptions of default-version routes (default: true)
    pub include_default_version: bool,
    /// Render versions in short-hand form, `v3` instead of `v3.0` (default: false)
    pub prefer_short_hand_version: bool,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            include_default_version: true,
            prefer_short_hand_version: false,
        }
    }
}

impl ExplorerOptions {
    /// Version format selected by `prefer_short_hand_version`
    pub fn version_format(&self) -> VersionFormat {
        if self.prefer_short_hand_version {
            VersionFormat::ShortHand
        } else {
            VersionFormat::Long
        }
    }
}

/// Options of URL path versioning
#[derive(Clone)]
pub struct UrlVersioningOptions {
    /// Version served by default-version routes (default: 1.0)
    pub default_api_version: ApiVersion,
    /// Synthesize default-version routes (default: true)
    pub assume_default_version_when_unspecified: bool,
    /// Resolver for inline route constraints; `None` uses
    /// [`DefaultConstraintResolver`]
    pub constraint_resolver: Option<Arc<dyn InlineConstraintResolver>>,
}

impl Default for UrlVersioningOptions {
    fn default() -> Self {
        Self {
            default_api_version: ApiVersion::default(),
            assume_default_version_when_unspecified: true,
            constraint_resolver: None,
        }
    }
}

impl fmt::Debug for UrlVersioningOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlVersioningOptions")
            .field("default_api_version", &self.default_api_version)
            .field(
                "assume_default_version_when_unspecified",
                &self.assume_default_version_when_unspecified,
            )
            .field("custom_constraint_resolver", &self.constraint_resolver.is_some())
            .finish()
    }
}

impl UrlVersioningOptions {
    /// The configured resolver, or the default one
    pub fn resolver(&self) -> Arc<dyn InlineConstraintResolver> {
        match &self.constraint_resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(DefaultConstraintResolver::new()),
        }
    }
}

/// All versioning options in one object
#[derive(Debug, Clone, Default)]
pub struct ApiVersioningOptions {
    /// Route expansion options
    pub url: UrlVersioningOptions,
    /// Description expansion options
    pub explorer: ExplorerOptions,
}

impl ApiVersioningOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default API version
    pub fn default_api_version(mut self, version: ApiVersion) -> Self {
        self.url.default_api_version = version;
        self
    }

    /// Set whether default-version routes are synthesized
    pub fn assume_default_version_when_unspecified(mut self, assume: bool) -> Self {
        self.url.assume_default_version_when_unspecified = assume;
        self
    }

    /// Set a custom inline constraint resolver
    pub fn constraint_resolver(
        mut self,
        resolver: impl InlineConstraintResolver + 'static,
    ) -> Self {
        self.url.constraint_resolver = Some(Arc::new(resolver));
        self
    }

    /// Set whether default-version descriptions are listed
    pub fn include_default_version(mut self, include: bool) -> Self {
        self.explorer.include_default_version = include;
        self
    }

    /// Set whether descriptions use short-hand versions
    pub fn prefer_short_hand_version(mut self, prefer: bool) -> Self {
        self.explorer.prefer_short_hand_version = prefer;
        self
    }
}

#[cfg(feature = "config")]
mod env {
    use super::ApiVersioningOptions;
    use crate::error::{Result, VersioningError};
    use crate::version::ApiVersion;
    use serde::Deserialize;

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "API_VERSIONING_";

    #[derive(Debug, Deserialize)]
    struct EnvOptions {
        default_api_version: Option<String>,
        assume_default_version_when_unspecified: Option<bool>,
        include_default_version: Option<bool>,
        prefer_short_hand_version: Option<bool>,
    }

    impl ApiVersioningOptions {
        /// Load options from `API_VERSIONING_*` environment variables
        ///
        /// Recognized variables:
        /// - `API_VERSIONING_DEFAULT_API_VERSION`
        /// - `API_VERSIONING_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED`
        /// - `API_VERSIONING_INCLUDE_DEFAULT_VERSION`
        /// - `API_VERSIONING_PREFER_SHORT_HAND_VERSION`
        ///
        /// Unset variables keep their defaults.
        ///
        /// # Errors
        ///
        /// Returns [`VersioningError::Config`] when a variable cannot be
        /// deserialized or the default version cannot be parsed.
        pub fn from_env() -> Result<Self> {
            let env = envy::prefixed(ENV_PREFIX)
                .from_env::<EnvOptions>()
                .map_err(|e| VersioningError::Config(e.to_string()))?;

            let mut options = Self::default();
            if let Some(version) = env.default_api_version {
                options.url.default_api_version = version.parse::<ApiVersion>().map_err(|e| {
                    VersioningError::Config(format!("{ENV_PREFIX}DEFAULT_API_VERSION: {e}"))
                })?;
            }
            if let Some(assume) = env.assume_default_version_when_unspecified {
                options.url.assume_default_version_when_unspecified = assume;
            }
            if let Some(include) = env.include_default_version {
                options.explorer.include_default_version = include;
            }
            if let Some(prefer) = env.prefer_short_hand_version {
                options.explorer.prefer_short_hand_version = prefer;
            }

            tracing::debug!(options = ?options, "Loaded versioning options from environment");
            Ok(options)
        }
    }

    /// Load environment variables from a `.env` file
    ///
    /// A missing file is not an error. Existing variables take precedence.
    pub fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }

    /// Load environment variables from a specific file
    pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
        let _ = dotenvy::from_path(path);
    }
}

#[cfg(feature = "config")]
pub use env::{load_dotenv, load_dotenv_from, ENV_PREFIX};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ApiVersioningOptions::default();
        assert_eq!(options.url.default_api_version, ApiVersion::new(1, 0));
        assert!(options.url.assume_default_version_when_unspecified);
        assert!(options.url.constraint_resolver.is_none());
        assert!(options.explorer.include_default_version);
        assert!(!options.explorer.prefer_short_hand_version);
        assert_eq!(options.explorer.version_format(), VersionFormat::Long);
    }

    #[test]
    fn test_builder() {
        let options = ApiVersioningOptions::new()
            .default_api_version(ApiVersion::new(3, 0))
            .assume_default_version_when_unspecified(false)
            .constraint_resolver(DefaultConstraintResolver::new().with_version_constraint("ver"))
            .prefer_short_hand_version(true);

        assert_eq!(options.url.default_api_version, ApiVersion::new(3, 0));
        assert!(!options.url.assume_default_version_when_unspecified);
        assert!(options.url.resolver().resolve("ver", None).is_some());
        assert_eq!(options.explorer.version_format(), VersionFormat::ShortHand);
    }

    #[test]
    fn test_explorer_options_serde_defaults() {
        let options: ExplorerOptions =
            serde_json::from_str(r#"{"prefer_short_hand_version": true}"#).unwrap();
        assert!(options.include_default_version);
        assert!(options.prefer_short_hand_version);
    }

    #[cfg(feature = "config")]
    mod env_tests {
        use super::*;
        use crate::error::VersioningError;
        use serial_test::serial;

        const VARS: [&str; 4] = [
            "API_VERSIONING_DEFAULT_API_VERSION",
            "API_VERSIONING_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED",
            "API_VERSIONING_INCLUDE_DEFAULT_VERSION",
            "API_VERSIONING_PREFER_SHORT_HAND_VERSION",
        ];

        fn clear() {
            for var in VARS {
                std::env::remove_var(var);
            }
        }

        #[test]
        #[serial]
        fn test_from_env_defaults() {
            clear();
            let options = ApiVersioningOptions::from_env().unwrap();
            assert_eq!(options.url.default_api_version, ApiVersion::new(1, 0));
            assert!(options.explorer.include_default_version);
        }

        #[test]
        #[serial]
        fn test_from_env_values() {
            clear();
            std::env::set_var("API_VERSIONING_DEFAULT_API_VERSION", "3.0");
            std::env::set_var("API_VERSIONING_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED", "false");
            std::env::set_var("API_VERSIONING_INCLUDE_DEFAULT_VERSION", "false");
            std::env::set_var("API_VERSIONING_PREFER_SHORT_HAND_VERSION", "true");

            let options = ApiVersioningOptions::from_env().unwrap();
            clear();

            assert_eq!(options.url.default_api_version, ApiVersion::new(3, 0));
            assert!(!options.url.assume_default_version_when_unspecified);
            assert!(!options.explorer.include_default_version);
            assert!(options.explorer.prefer_short_hand_version);
        }

        #[test]
        #[serial]
        fn test_from_env_errors() {
            clear();
            std::env::set_var("API_VERSIONING_DEFAULT_API_VERSION", "three");
            let result = ApiVersioningOptions::from_env();
            clear();
            assert!(matches!(result, Err(VersioningError::Config(_))));

            std::env::set_var("API_VERSIONING_INCLUDE_DEFAULT_VERSION", "maybe");
            let result = ApiVersioningOptions::from_env();
            clear();
            assert!(matches!(result, Err(VersioningError::Config(_))));
        }
    }
}
