//! URL path API versioning for RustAPI
//!
//! This crate layers URL-path based API versioning (`/api/v1/resource`) on a
//! host's attribute routing and API description subsystem. It provides two
//! transformations:
//!
//! - **Route expansion**: a version-agnostic template such as
//!   `api/v{version:apiVersion}/agreements/{accountId}` is registered once per
//!   declared API version, plus a default-version route
//!   (`api/agreements/{accountId}`) when the action declares the configured
//!   default version.
//! - **Description expansion**: the raw API descriptions of the registered
//!   routes are rewritten into one description per version, with the version
//!   substituted in the path and the version parameter removed.
//!
//! # Features
//!
//! - `ApiVersion` parsing with long (`3.0`) and short-hand (`3`) formatting
//! - Inline route constraints with a pluggable resolver
//! - Lazily materialized, thread-safe API explorer
//! - Version-aware action selection
//! - OpenAPI 3.0 rendering of the description list
//! - `config` (default): options from `API_VERSIONING_*` environment variables
//!
//! # Usage
//!
//! ```rust
//! use http::Method;
//! use rustapi_versioning::{
//!     ActionDescriptor, ApiConfiguration, ApiVersion, ApiVersioningOptions, ControllerDescriptor,
//! };
//!
//! let controller = |name: &str, versions: &[&str]| -> rustapi_versioning::Result<_> {
//!     let mut controller = ControllerDescriptor::new(name)
//!         .route_prefix("api/v{version:apiVersion}/agreements");
//!     for version in versions {
//!         controller = controller.api_version(version)?;
//!     }
//!     Ok(controller.action(ActionDescriptor::new(Method::GET, "Get").route("{accountId}")))
//! };
//!
//! let mut config = ApiConfiguration::new();
//! config
//!     .add_controller(controller("V1", &["1.0"])?)
//!     .add_controller(controller("V2", &["2.0"])?)
//!     .add_controller(controller("V3", &["3.0", "4.0"])?);
//! config.add_api_versioning(
//!     ApiVersioningOptions::new().default_api_version(ApiVersion::new(3, 0)),
//! )?;
//!
//! let explorer = config.api_explorer()?;
//! let paths: Vec<&str> = explorer
//!     .api_descriptions()
//!     .iter()
//!     .map(|d| d.relative_path.as_str())
//!     .collect();
//! assert_eq!(
//!     paths,
//!     [
//!         "api/v1.0/agreements/{accountId}",
//!         "api/v2.0/agreements/{accountId}",
//!         "api/v3.0/agreements/{accountId}",
//!         "api/v4.0/agreements/{accountId}",
//!         "api/agreements/{accountId}",
//!     ]
//! );
//!
//! let selector = config.action_selector()?;
//! let selection = selector.select(&Method::GET, "/api/v4/agreements/42").unwrap();
//! assert_eq!(selection.action.controller(), "V3");
//! # Ok::<(), rustapi_versioning::VersioningError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod action;
mod config;
mod configuration;
mod constraint;
mod description;
mod error;
pub mod explorer;
mod model;
pub mod openapi;
mod routes;
mod selector;
mod template;
mod version;

#[cfg(test)]
mod tests;

pub use action::{
    ActionDescriptor, ControllerDescriptor, ParameterDescription, ParameterSource,
    ResponseDescription, RouteAttribute,
};
pub use config::{ApiVersioningOptions, ExplorerOptions, UrlVersioningOptions};
#[cfg(feature = "config")]
pub use config::{load_dotenv, load_dotenv_from, ENV_PREFIX};
pub use configuration::ApiConfiguration;
pub use constraint::{DefaultConstraintResolver, InlineConstraintResolver, RouteConstraint};
pub use description::{DefaultDescriptionProvider, DescriptionEntry, DescriptionProvider};
pub use error::{Result, SelectionError, VersioningError};
pub use explorer::{build_versioned_descriptions, ApiExplorer};
pub use model::VersionModel;
pub use openapi::OpenApiSpec;
pub use routes::{
    registered_entries, BaseRoute, ExpandedRoute, RouteEntry, RouteExpander, RouteVersion,
    DEFAULT_VERSION_ROUTE_SUFFIX,
};
pub use selector::{ActionSelector, Selection};
pub use template::{
    replace_parameter_tokens, Parameter, RouteTemplate, RouteValues, Segment, SegmentPart,
};
pub use version::{ApiVersion, VersionFormat};
