//! Version-aware action selection
//!
//! Maps a request to the single action that serves it. The requested API
//! version is read from the version segment of the matched route, or is the
//! default version for routes without one.

use crate::action::ActionDescriptor;
use crate::error::SelectionError;
use crate::routes::RouteEntry;
use crate::template::RouteValues;
use crate::version::ApiVersion;
use http::Method;
use std::sync::Arc;
use tracing::trace;

/// The outcome of a successful selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected action
    pub action: Arc<ActionDescriptor>,
    /// Route that matched
    pub route: Arc<RouteEntry>,
    /// Requested or assumed API version (`None` for unversioned requests)
    pub api_version: Option<ApiVersion>,
    /// Captured route values
    pub values: RouteValues,
}

/// Selects actions for requests over the registered routes
#[derive(Debug, Clone)]
pub struct ActionSelector {
    routes: Vec<Arc<RouteEntry>>,
    default_version: Option<ApiVersion>,
}

impl ActionSelector {
    /// Create a selector
    ///
    /// `default_version` is assumed for requests that omit the version; pass
    /// `None` when no version should be assumed.
    pub fn new(routes: Vec<Arc<RouteEntry>>, default_version: Option<ApiVersion>) -> Self {
        Self {
            routes,
            default_version,
        }
    }

    /// Select the action serving `method` and `path`
    ///
    /// # Errors
    ///
    /// - [`SelectionError::NoMatchingRoute`] when no route matches
    /// - [`SelectionError::UnsupportedApiVersion`] when routes match but no
    ///   action declares the requested version
    /// - [`SelectionError::AmbiguousAction`] when several actions qualify
    pub fn select(&self, method: &Method, path: &str) -> Result<Selection, SelectionError> {
        let mut matched = false;
        let mut requested: Option<String> = None;
        let mut candidates: Vec<Selection> = Vec::new();

        for route in &self.routes {
            let action = route.action();
            if action.method() != method {
                continue;
            }
            let Some(values) = route.template().match_path(path) else {
                continue;
            };
            matched = true;

            let api_version = match route.version_parameters().first() {
                Some(name) => values.get(name).and_then(|raw| raw.parse().ok()),
                None => route
                    .default_version()
                    .or(self.default_version.as_ref())
                    .cloned(),
            };

            let model = action.version_model();
            let accepted = model.is_neutral()
                || api_version
                    .as_ref()
                    .map_or(true, |version| model.declares_equivalent(version));

            trace!(
                action = %action.display_name(),
                template = %route.template(),
                version = ?api_version,
                accepted,
                "Selection candidate"
            );

            if !accepted {
                if let Some(version) = &api_version {
                    requested = Some(version.to_string());
                }
                continue;
            }

            if !candidates.iter().any(|c| Arc::ptr_eq(&c.action, action)) {
                candidates.push(Selection {
                    action: Arc::clone(action),
                    route: Arc::clone(route),
                    api_version: if model.is_neutral() { None } else { api_version },
                    values,
                });
            }
        }

        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            0 if matched => Err(SelectionError::UnsupportedApiVersion {
                method: method.clone(),
                path: path.to_string(),
                version: requested.unwrap_or_default(),
            }),
            0 => Err(SelectionError::NoMatchingRoute {
                method: method.clone(),
                path: path.to_string(),
            }),
            _ => Err(SelectionError::AmbiguousAction {
                method: method.clone(),
                path: path.to_string(),
                candidates: candidates.iter().map(|c| c.action.display_name()).collect(),
            }),
        }
    }

    /// Registered routes
    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        &self.routes
    }
}
