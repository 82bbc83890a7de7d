//! Error types for API versioning

use http::Method;
use thiserror::Error;

/// Result type alias for versioning operations
pub type Result<T, E = VersioningError> = std::result::Result<T, E>;

/// Error type for versioning setup and parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersioningError {
    /// Version string could not be parsed into major/minor/status
    #[error("invalid API version format: \"{0}\"")]
    InvalidVersionFormat(String),

    /// Route template syntax error
    #[error("invalid route template \"{template}\": {reason}")]
    InvalidRouteTemplate {
        /// The offending template
        template: String,
        /// What is wrong with it
        reason: String,
    },

    /// Inline constraint unknown to the constraint resolver
    #[error("unknown route constraint \"{constraint}\" in template \"{template}\"")]
    UnknownConstraint {
        /// The template declaring the constraint
        template: String,
        /// The constraint as written, without arguments
        constraint: String,
    },

    /// A versioned model was declared without any version
    #[error("a versioned model must declare at least one API version")]
    EmptyVersionSet,

    /// Two registered routes share a name
    #[error("duplicate route name \"{0}\"")]
    DuplicateRouteName(String),

    /// A registration hook was invoked twice on the same configuration
    #[error("{0} is already registered on this configuration")]
    AlreadyRegistered(&'static str),

    /// Environment configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl VersioningError {
    /// Create an invalid route template error
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRouteTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }
}

/// Error returned when a request cannot be mapped to exactly one action
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No registered route matches the method and path
    #[error("no route matches {method} {path}")]
    NoMatchingRoute {
        /// Request method
        method: Method,
        /// Request path
        path: String,
    },

    /// A route matched, but no action implements the requested version
    #[error("API version {version} is not supported by {method} {path}")]
    UnsupportedApiVersion {
        /// Request method
        method: Method,
        /// Request path
        path: String,
        /// The requested (or assumed default) version
        version: String,
    },

    /// More than one action matches the request
    #[error("{method} {path} matches multiple actions: {}", .candidates.join(", "))]
    AmbiguousAction {
        /// Request method
        method: Method,
        /// Request path
        path: String,
        /// `Controller.Action` of every candidate
        candidates: Vec<String>,
    },
}
