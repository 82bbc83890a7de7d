//! Host configuration and registration hooks
//!
//! [`ApiConfiguration`] plays the part of the host framework's configuration
//! object: it owns the controllers, parses their attribute routes, and builds
//! the registered route table, the API explorer and the action selector.
//! Versioning is switched on through the registration hooks.
//!
//! # Example
//!
//! ```rust
//! use http::Method;
//! use rustapi_versioning::{ActionDescriptor, ApiConfiguration, ApiVersion, ControllerDescriptor};
//!
//! let mut config = ApiConfiguration::new();
//! config.add_controller(
//!     ControllerDescriptor::new("Agreements")
//!         .api_version("3.0")?
//!         .route_prefix("api/v{version:apiVersion}/agreements")
//!         .action(ActionDescriptor::new(Method::GET, "Get").route("{accountId}")),
//! );
//! config.add_api_versioning_with_url_support(|url| {
//!     url.default_api_version = ApiVersion::new(3, 0);
//! })?;
//! config.add_api_versioning_aware_explorer(|explorer| {
//!     explorer.prefer_short_hand_version = true;
//! })?;
//!
//! let paths: Vec<String> = config
//!     .api_explorer()?
//!     .api_descriptions()
//!     .iter()
//!     .map(|d| d.relative_path.clone())
//!     .collect();
//! assert_eq!(paths, ["api/v3/agreements/{accountId}", "api/agreements/{accountId}"]);
//! # Ok::<(), rustapi_versioning::VersioningError>(())
//! ```

use crate::action::ControllerDescriptor;
use crate::config::{ApiVersioningOptions, ExplorerOptions, UrlVersioningOptions};
use crate::constraint::{DefaultConstraintResolver, InlineConstraintResolver};
use crate::description::{DefaultDescriptionProvider, DescriptionProvider};
use crate::error::{Result, VersioningError};
use crate::explorer::ApiExplorer;
use crate::routes::{registered_entries, BaseRoute, ExpandedRoute, RouteEntry, RouteExpander};
use crate::selector::ActionSelector;
use crate::template::RouteTemplate;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const URL_VERSIONING: &str = "URL path API versioning";
const VERSIONED_EXPLORER: &str = "API versioning aware explorer";

/// Everything built by [`ApiConfiguration::ensure_initialized`]
struct Initialized {
    expanded: Vec<ExpandedRoute>,
    routes: Vec<Arc<RouteEntry>>,
    explorer: Arc<ApiExplorer>,
    selector: Arc<ActionSelector>,
}

/// Host configuration object
pub struct ApiConfiguration {
    controllers: Vec<ControllerDescriptor>,
    url_versioning: Option<UrlVersioningOptions>,
    explorer_options: Option<ExplorerOptions>,
    provider: Arc<dyn DescriptionProvider>,
    state: Option<Initialized>,
}

impl ApiConfiguration {
    /// Create an empty configuration without versioning
    pub fn new() -> Self {
        Self {
            controllers: Vec::new(),
            url_versioning: None,
            explorer_options: None,
            provider: Arc::new(DefaultDescriptionProvider),
            state: None,
        }
    }

    /// Register a controller
    pub fn add_controller(&mut self, controller: ControllerDescriptor) -> &mut Self {
        self.controllers.push(controller);
        self.state = None;
        self
    }

    /// Enable URL path versioning
    ///
    /// `setup` adjusts the [`UrlVersioningOptions`]. Route expansion takes
    /// effect at the next initialization.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::AlreadyRegistered`] when URL versioning is
    /// already enabled.
    pub fn add_api_versioning_with_url_support(
        &mut self,
        setup: impl FnOnce(&mut UrlVersioningOptions),
    ) -> Result<&mut Self> {
        if self.url_versioning.is_some() {
            return Err(VersioningError::AlreadyRegistered(URL_VERSIONING));
        }

        let mut options = UrlVersioningOptions::default();
        setup(&mut options);
        debug!(options = ?options, "Registered URL path API versioning");

        self.url_versioning = Some(options);
        self.state = None;
        Ok(self)
    }

    /// Replace the API explorer with the version-aware one
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::AlreadyRegistered`] when the version-aware
    /// explorer is already installed.
    pub fn add_api_versioning_aware_explorer(
        &mut self,
        setup: impl FnOnce(&mut ExplorerOptions),
    ) -> Result<&mut Self> {
        if self.explorer_options.is_some() {
            return Err(VersioningError::AlreadyRegistered(VERSIONED_EXPLORER));
        }

        let mut options = ExplorerOptions::default();
        setup(&mut options);
        debug!(options = ?options, "Registered API versioning aware explorer");

        self.explorer_options = Some(options);
        self.state = None;
        Ok(self)
    }

    /// Register both hooks from one options object
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::AlreadyRegistered`] when either hook is
    /// already registered; nothing is changed in that case.
    pub fn add_api_versioning(&mut self, options: ApiVersioningOptions) -> Result<&mut Self> {
        if self.url_versioning.is_some() {
            return Err(VersioningError::AlreadyRegistered(URL_VERSIONING));
        }
        if self.explorer_options.is_some() {
            return Err(VersioningError::AlreadyRegistered(VERSIONED_EXPLORER));
        }

        let ApiVersioningOptions { url, explorer } = options;
        self.add_api_versioning_with_url_support(|o| *o = url)?;
        self.add_api_versioning_aware_explorer(|o| *o = explorer)
    }

    /// Replace the generic description builder
    pub fn set_description_provider(
        &mut self,
        provider: Arc<dyn DescriptionProvider>,
    ) -> &mut Self {
        self.provider = provider;
        self.state = None;
        self
    }

    /// Whether URL versioning is enabled
    pub fn is_url_versioning_enabled(&self) -> bool {
        self.url_versioning.is_some()
    }

    /// URL versioning options, if enabled
    pub fn url_versioning_options(&self) -> Option<&UrlVersioningOptions> {
        self.url_versioning.as_ref()
    }

    /// Explorer options, if the version-aware explorer is installed
    pub fn explorer_options(&self) -> Option<&ExplorerOptions> {
        self.explorer_options.as_ref()
    }

    /// Controllers in registration order
    pub fn controllers(&self) -> &[ControllerDescriptor] {
        &self.controllers
    }

    /// Parse and expand every attribute route and build the explorer
    ///
    /// Runs once; later calls are no-ops until the configuration changes.
    ///
    /// # Errors
    ///
    /// Template and constraint errors of any attribute route, and
    /// [`VersioningError::DuplicateRouteName`].
    pub fn ensure_initialized(&mut self) -> Result<()> {
        self.initialized().map(|_| ())
    }

    /// Registered routes
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::ensure_initialized`].
    pub fn routes(&mut self) -> Result<&[Arc<RouteEntry>]> {
        Ok(&self.initialized()?.routes)
    }

    /// Routes viewed per version binding
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::ensure_initialized`].
    pub fn expanded_routes(&mut self) -> Result<&[ExpandedRoute]> {
        Ok(&self.initialized()?.expanded)
    }

    /// The API explorer (version-aware when the explorer hook is registered)
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::ensure_initialized`].
    pub fn api_explorer(&mut self) -> Result<Arc<ApiExplorer>> {
        Ok(Arc::clone(&self.initialized()?.explorer))
    }

    /// The action selector
    ///
    /// # Errors
    ///
    /// See [`ApiConfiguration::ensure_initialized`].
    pub fn action_selector(&mut self) -> Result<Arc<ActionSelector>> {
        Ok(Arc::clone(&self.initialized()?.selector))
    }

    fn initialized(&mut self) -> Result<&Initialized> {
        let state = match self.state.take() {
            Some(state) => state,
            None => self.initialize()?,
        };
        Ok(self.state.insert(state))
    }

    fn initialize(&self) -> Result<Initialized> {
        let resolver: Arc<dyn InlineConstraintResolver> = match &self.url_versioning {
            Some(url) => url.resolver(),
            None => Arc::new(DefaultConstraintResolver::new()),
        };
        let expander = self.url_versioning.as_ref().map(|url| {
            RouteExpander::new(url.default_api_version.clone())
                .assume_default_version(url.assume_default_version_when_unspecified)
        });

        let mut expanded = Vec::new();
        for controller in &self.controllers {
            let prefix = controller.prefix().map(str::to_string);

            for action in controller.clone().into_actions() {
                let mut base = Vec::with_capacity(action.routes().len());
                for attribute in action.routes() {
                    let template = RouteTemplate::combine(prefix.as_deref(), &attribute.template);
                    base.push(BaseRoute {
                        template: RouteTemplate::parse(&template, resolver.as_ref())?,
                        name: attribute.name.clone(),
                    });
                }

                match &expander {
                    Some(expander) => expanded.extend(expander.expand(&action, &base)),
                    None => expanded.extend(RouteExpander::unexpanded(&action, &base)),
                }
            }
        }

        let routes = registered_entries(&expanded);

        let mut names = HashSet::new();
        for route in &routes {
            if let Some(name) = route.name() {
                if !names.insert(name.to_string()) {
                    return Err(VersioningError::DuplicateRouteName(name.to_string()));
                }
            }
        }

        let explorer = Arc::new(ApiExplorer::new(
            routes.clone(),
            Arc::clone(&self.provider),
            self.explorer_options,
        ));

        let default_version = self
            .url_versioning
            .as_ref()
            .filter(|url| url.assume_default_version_when_unspecified)
            .map(|url| url.default_api_version.clone());
        let selector = Arc::new(ActionSelector::new(routes.clone(), default_version));

        debug!(
            controllers = self.controllers.len(),
            routes = routes.len(),
            expanded = expanded.len(),
            url_versioning = self.url_versioning.is_some(),
            "Initialized API configuration"
        );

        Ok(Initialized {
            expanded,
            routes,
            explorer,
            selector,
        })
    }
}

impl Default for ApiConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ApiConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfiguration")
            .field("controllers", &self.controllers.len())
            .field("url_versioning", &self.url_versioning)
            .field("explorer_options", &self.explorer_options)
            .field("initialized", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
