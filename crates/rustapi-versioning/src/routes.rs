//! Route expansion
//!
//! Turns the attribute routes of an action into the set of routes the host
//! registers. A template carrying the version placeholder, e.g.
//! `api/v{version:apiVersion}/agreements/{accountId}`, is served once per
//! declared version; when the action declares the configured default
//! version, an extra route without the version segment
//! (`api/agreements/{accountId}`) serves requests that omit the version.

use crate::action::ActionDescriptor;
use crate::template::{replace_parameter_tokens, RouteTemplate};
use crate::version::{ApiVersion, VersionFormat};
use std::sync::Arc;
use tracing::{debug, trace};

/// Suffix appended to the name of a synthesized default-version route
pub const DEFAULT_VERSION_ROUTE_SUFFIX: &str = "DefaultVersion";

/// A parsed attribute route before expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRoute {
    /// Parsed template (prefix already combined)
    pub template: RouteTemplate,
    /// Optional route name
    pub name: Option<String>,
}

impl BaseRoute {
    /// Create an unnamed base route
    pub fn new(template: RouteTemplate) -> Self {
        Self {
            template,
            name: None,
        }
    }

    /// Set the route name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A route as registered with the host
///
/// Shared between every [`ExpandedRoute`] produced from the same template.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    template: RouteTemplate,
    name: Option<String>,
    action: Arc<ActionDescriptor>,
    version_parameters: Vec<String>,
    default_version: Option<ApiVersion>,
    removed_parameters: Vec<String>,
}

impl RouteEntry {
    fn new(
        action: &Arc<ActionDescriptor>,
        base: BaseRoute,
        version_parameters: Vec<String>,
        default_version: Option<ApiVersion>,
    ) -> Self {
        Self {
            template: base.template,
            name: base.name,
            action: Arc::clone(action),
            version_parameters,
            default_version,
            removed_parameters: Vec::new(),
        }
    }

    /// Parsed template
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Route name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Owning action
    pub fn action(&self) -> &Arc<ActionDescriptor> {
        &self.action
    }

    /// Names of the parameters constrained to an API version
    ///
    /// Empty for version-neutral actions, for templates without a version
    /// placeholder and for default-version routes.
    pub fn version_parameters(&self) -> &[String] {
        &self.version_parameters
    }

    /// Whether the entry carries a version constraint
    pub fn is_version_constrained(&self) -> bool {
        !self.version_parameters.is_empty()
    }

    /// Whether this is a synthesized default-version route
    pub fn is_default_version(&self) -> bool {
        self.default_version.is_some()
    }

    /// Version served by a default-version route
    pub fn default_version(&self) -> Option<&ApiVersion> {
        self.default_version.as_ref()
    }

    /// Version parameters whose segments were removed to build a
    /// default-version route
    pub fn removed_parameters(&self) -> &[String] {
        &self.removed_parameters
    }
}

/// The version an expanded route is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteVersion {
    /// No version constraint (version-neutral action or template without
    /// a version placeholder)
    Any,
    /// One declared version
    Specific(ApiVersion),
    /// The default version, served without a version segment
    Default(ApiVersion),
}

/// A registered route viewed through one version binding
#[derive(Debug, Clone)]
pub struct ExpandedRoute {
    entry: Arc<RouteEntry>,
    version: RouteVersion,
}

impl ExpandedRoute {
    fn unconstrained(action: &Arc<ActionDescriptor>, base: BaseRoute) -> Self {
        Self {
            entry: Arc::new(RouteEntry::new(action, base, Vec::new(), None)),
            version: RouteVersion::Any,
        }
    }

    /// The shared route entry
    pub fn entry(&self) -> &Arc<RouteEntry> {
        &self.entry
    }

    /// Version binding
    pub fn version(&self) -> &RouteVersion {
        &self.version
    }

    /// Owning action
    pub fn action(&self) -> &Arc<ActionDescriptor> {
        &self.entry.action
    }

    /// Whether this is the default-version route
    pub fn is_default_version(&self) -> bool {
        matches!(self.version, RouteVersion::Default(_))
    }

    /// Route name, if any
    pub fn name(&self) -> Option<&str> {
        self.entry.name()
    }

    /// Concrete path with the version placeholder substituted
    ///
    /// ```rust
    /// use http::Method;
    /// use rustapi_versioning::{
    ///     ActionDescriptor, ApiVersion, BaseRoute, ControllerDescriptor, RouteExpander,
    ///     VersionFormat,
    /// };
    ///
    /// let action = ControllerDescriptor::new("Agreements")
    ///     .api_version("3.0")?
    ///     .action(ActionDescriptor::new(Method::GET, "Get"))
    ///     .into_actions()
    ///     .remove(0);
    /// let base = BaseRoute::new("api/v{version:apiVersion}/agreements/{accountId}".parse()?);
    ///
    /// let routes = RouteExpander::new(ApiVersion::new(3, 0)).expand(&action, &[base]);
    /// let paths: Vec<_> = routes.iter().map(|r| r.path(VersionFormat::ShortHand)).collect();
    /// assert_eq!(paths, ["api/v3/agreements/{accountId}", "api/agreements/{accountId}"]);
    /// # Ok::<(), rustapi_versioning::VersioningError>(())
    /// ```
    pub fn path(&self, format: VersionFormat) -> String {
        let path = self.entry.template.relative_path();
        match &self.version {
            RouteVersion::Specific(version) => replace_parameter_tokens(
                &path,
                &self.entry.version_parameters,
                &version.format(format),
            ),
            RouteVersion::Any | RouteVersion::Default(_) => path,
        }
    }
}

/// Expands attribute routes into per-version routes
#[derive(Debug, Clone)]
pub struct RouteExpander {
    default_version: ApiVersion,
    assume_default_version: bool,
}

impl RouteExpander {
    /// Create an expander for the configured default version
    pub fn new(default_version: ApiVersion) -> Self {
        Self {
            default_version,
            assume_default_version: true,
        }
    }

    /// Whether default-version routes are synthesized (default: true)
    pub fn assume_default_version(mut self, assume: bool) -> Self {
        self.assume_default_version = assume;
        self
    }

    /// Configured default version
    pub fn default_version(&self) -> &ApiVersion {
        &self.default_version
    }

    /// Expand the base routes of one action
    ///
    /// - A version-neutral action keeps every base route unchanged.
    /// - A template with the version placeholder yields one route per
    ///   declared version, in declaration order.
    /// - A template without the placeholder yields a single unconstrained route.
    /// - When the action declares the default version, every placeholder
    ///   template additionally yields a default-version route with the
    ///   placeholder segment removed. These come after all base routes.
    pub fn expand(
        &self,
        action: &Arc<ActionDescriptor>,
        base_routes: &[BaseRoute],
    ) -> Vec<ExpandedRoute> {
        let model = action.version_model();

        if model.is_neutral() {
            return Self::unexpanded(action, base_routes);
        }

        let is_default_version_action =
            self.assume_default_version && model.declares_equivalent(&self.default_version);

        let mut expanded = Vec::new();
        let mut defaults = Vec::new();

        for base in base_routes {
            let version_parameters = base.template.version_parameters();

            if version_parameters.is_empty() {
                expanded.push(ExpandedRoute::unconstrained(action, base.clone()));
                continue;
            }

            if is_default_version_action {
                let template = base.template.without_parameter_segments(&version_parameters);
                let name = base
                    .name
                    .as_ref()
                    .map(|name| format!("{name}{DEFAULT_VERSION_ROUTE_SUFFIX}"));
                debug!(
                    action = %action.display_name(),
                    template = %template,
                    version = %self.default_version,
                    "Synthesized default version route"
                );
                let mut entry = RouteEntry::new(
                    action,
                    BaseRoute { template, name },
                    Vec::new(),
                    Some(self.default_version.clone()),
                );
                entry.removed_parameters = version_parameters.clone();
                defaults.push(ExpandedRoute {
                    entry: Arc::new(entry),
                    version: RouteVersion::Default(self.default_version.clone()),
                });
            }

            let entry = Arc::new(RouteEntry::new(action, base.clone(), version_parameters, None));
            for version in model.declared() {
                trace!(template = %entry.template, version = %version, "Expanded route");
                expanded.push(ExpandedRoute {
                    entry: Arc::clone(&entry),
                    version: RouteVersion::Specific(version.clone()),
                });
            }
        }

        expanded.extend(defaults);

        debug!(
            action = %action.display_name(),
            base_routes = base_routes.len(),
            routes = expanded.len(),
            "Expanded action routes"
        );

        expanded
    }

    /// Register base routes as declared, without any version constraint
    ///
    /// Used for version-neutral actions and when URL versioning is off.
    pub fn unexpanded(
        action: &Arc<ActionDescriptor>,
        base_routes: &[BaseRoute],
    ) -> Vec<ExpandedRoute> {
        base_routes
            .iter()
            .map(|base| ExpandedRoute::unconstrained(action, base.clone()))
            .collect()
    }
}

impl Default for RouteExpander {
    fn default() -> Self {
        Self::new(ApiVersion::default())
    }
}

/// Distinct registered entries of an expansion, in first-seen order
pub fn registered_entries(expanded: &[ExpandedRoute]) -> Vec<Arc<RouteEntry>> {
    let mut entries: Vec<Arc<RouteEntry>> = Vec::new();
    for route in expanded {
        if !entries.iter().any(|e| Arc::ptr_eq(e, &route.entry)) {
            entries.push(Arc::clone(&route.entry));
        }
    }
    entries
}
