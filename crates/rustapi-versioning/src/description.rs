//! API description entries
//!
//! A [`DescriptionEntry`] documents one operation: method, relative path,
//! parameters and response metadata. The [`DescriptionProvider`] is the
//! host's generic builder that produces one raw entry per registered route;
//! version awareness is layered on top by [`crate::explorer`].

use crate::action::{ActionDescriptor, ParameterDescription, ResponseDescription};
use crate::constraint::RouteConstraint;
use crate::routes::RouteEntry;
use crate::template::Parameter;
use crate::version::ApiVersion;
use http::Method;
use std::sync::Arc;

/// One documented operation
#[derive(Debug, Clone)]
pub struct DescriptionEntry {
    /// HTTP method
    pub method: Method,
    /// Path template relative to the application root, without constraints
    pub relative_path: String,
    /// Operation documentation
    pub documentation: Option<Arc<str>>,
    /// Parameters (path parameters first, in template order)
    pub parameters: Vec<ParameterDescription>,
    /// Response metadata
    pub response: Arc<ResponseDescription>,
    /// Supported request media types
    pub request_formatters: Arc<[String]>,
    /// Supported response media types
    pub response_formatters: Arc<[String]>,
    /// Route the entry was built from
    pub route: Arc<RouteEntry>,
    /// Version the entry was expanded for
    pub api_version: Option<ApiVersion>,
}

impl DescriptionEntry {
    /// Owning action
    pub fn action(&self) -> &Arc<ActionDescriptor> {
        self.route.action()
    }

    /// Owning controller name
    pub fn controller(&self) -> &str {
        self.route.action().controller()
    }

    /// Whether the entry documents a default-version route
    pub fn is_default_version(&self) -> bool {
        self.route.is_default_version()
    }

    /// Whether the entry documents an operation reachable with `version`
    ///
    /// Expanded entries apply to their own version, default-version entries
    /// to the default version, entries of version-neutral actions to every
    /// version, and other unconstrained entries to the versions their action
    /// declares.
    pub fn applies_to(&self, version: &ApiVersion) -> bool {
        if let Some(own) = &self.api_version {
            return own.is_equivalent_to(version);
        }
        if let Some(default) = self.route.default_version() {
            return default.is_equivalent_to(version);
        }

        let model = self.action().version_model();
        model.is_neutral() || model.declares_equivalent(version)
    }
}

/// Builds raw description entries from registered routes
pub trait DescriptionProvider: Send + Sync {
    /// Describe every route, in route order
    fn describe(&self, routes: &[Arc<RouteEntry>]) -> Vec<DescriptionEntry>;
}

/// Generic, version-unaware description builder
///
/// Produces one entry per route. Path parameters come from the route
/// template, followed by the parameters the action declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDescriptionProvider;

impl DefaultDescriptionProvider {
    fn describe_route(route: &Arc<RouteEntry>) -> DescriptionEntry {
        let action = route.action();

        let mut parameters: Vec<ParameterDescription> = route
            .template()
            .parameters()
            .map(path_parameter)
            .collect();
        parameters.extend(action.parameters().iter().cloned());

        DescriptionEntry {
            method: action.method().clone(),
            relative_path: route.template().relative_path(),
            documentation: action.action_documentation().map(Arc::from),
            parameters,
            response: Arc::clone(action.response_description()),
            request_formatters: Arc::from(action.request_media_types()),
            response_formatters: Arc::from(action.response_media_types()),
            route: Arc::clone(route),
            api_version: None,
        }
    }
}

impl DescriptionProvider for DefaultDescriptionProvider {
    fn describe(&self, routes: &[Arc<RouteEntry>]) -> Vec<DescriptionEntry> {
        routes.iter().map(Self::describe_route).collect()
    }
}

fn path_parameter(param: &Parameter) -> ParameterDescription {
    let type_name = param
        .constraints
        .iter()
        .find_map(|c| match c {
            RouteConstraint::Int
            | RouteConstraint::Long
            | RouteConstraint::Min(_)
            | RouteConstraint::Max(_) => Some("integer"),
            RouteConstraint::Bool => Some("boolean"),
            _ => None,
        })
        .unwrap_or("string");

    ParameterDescription::path(&param.name)
        .required(!param.optional)
        .type_name(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ControllerDescriptor, ParameterSource};
    use crate::routes::{registered_entries, BaseRoute, RouteExpander};

    fn entries() -> Vec<Arc<RouteEntry>> {
        let action = ControllerDescriptor::new("Agreements")
            .api_version("3.0")
            .unwrap()
            .action(
                ActionDescriptor::new(Method::GET, "Get")
                    .documentation("Gets an agreement")
                    .parameter(ParameterDescription::query("expand").type_name("boolean")),
            )
            .into_actions()
            .remove(0);
        let base = BaseRoute::new(
            "api/v{version:apiVersion}/agreements/{accountId}/{page:int?}"
                .parse()
                .unwrap(),
        );
        registered_entries(&RouteExpander::new(ApiVersion::new(3, 0)).expand(&action, &[base]))
    }

    #[test]
    fn test_default_provider_builds_one_entry_per_route() {
        let described = DefaultDescriptionProvider.describe(&entries());

        assert_eq!(described.len(), 2);
        assert_eq!(described[0].relative_path, "api/v{version}/agreements/{accountId}/{page}");
        assert_eq!(described[1].relative_path, "api/agreements/{accountId}/{page}");
        assert_eq!(described[0].method, Method::GET);
        assert_eq!(described[0].documentation.as_deref(), Some("Gets an agreement"));
        assert_eq!(described[0].controller(), "Agreements");
        assert!(described[1].is_default_version());
        assert!(described.iter().all(|d| d.api_version.is_none()));
    }

    #[test]
    fn test_default_provider_parameters() {
        let described = DefaultDescriptionProvider.describe(&entries());

        let names: Vec<_> = described[0].parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["version", "accountId", "page", "expand"]);

        let page = &described[0].parameters[2];
        assert_eq!(page.source, ParameterSource::Path);
        assert!(!page.required);
        assert_eq!(page.type_name.as_deref(), Some("integer"));
        assert_eq!(described[0].parameters[3].source, ParameterSource::Query);

        let names: Vec<_> = described[1].parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["accountId", "page", "expand"]);
    }

    #[test]
    fn test_formatters_and_response_are_shared() {
        let described = DefaultDescriptionProvider.describe(&entries());
        assert_eq!(&*described[0].response_formatters, &["application/json".to_string()]);
        assert!(Arc::ptr_eq(&described[0].response, &described[1].response));
    }

    #[test]
    fn test_applies_to() {
        let described = DefaultDescriptionProvider.describe(&entries());
        assert!(described[0].applies_to(&ApiVersion::major(3)));
        assert!(!described[0].applies_to(&ApiVersion::new(4, 0)));
        assert!(described[1].applies_to(&ApiVersion::new(3, 0)));
    }
}
