//! Controller and action descriptors
//!
//! These describe what the host application exposes: controllers with an
//! optional route prefix and version metadata, and actions with their HTTP
//! method, attribute routes and documentation.
//!
//! # Example
//!
//! ```rust
//! use http::Method;
//! use rustapi_versioning::{ActionDescriptor, ControllerDescriptor};
//!
//! let controller = ControllerDescriptor::new("Agreements")
//!     .api_version("3.0")?
//!     .api_version("4.0")?
//!     .route_prefix("api/v{version:apiVersion}/agreements")
//!     .action(ActionDescriptor::new(Method::GET, "Get").route("{accountId}"));
//!
//! assert_eq!(controller.version_model().declared().len(), 2);
//! # Ok::<(), rustapi_versioning::VersioningError>(())
//! ```

use crate::error::Result;
use crate::model::VersionModel;
use crate::version::ApiVersion;
use http::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a parameter is bound from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterSource {
    /// URL path segment
    Path,
    /// Query string
    Query,
    /// Request header
    Header,
    /// Request body
    Body,
}

/// Documentation of a single action parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescription {
    /// Parameter name
    pub name: String,
    /// Binding source
    pub source: ParameterSource,
    /// Whether the parameter must be supplied
    pub required: bool,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Declared type name (e.g. "string", "integer", "CreateAgreement")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ParameterDescription {
    /// Create a parameter description
    pub fn new(name: impl Into<String>, source: ParameterSource) -> Self {
        Self {
            name: name.into(),
            source,
            required: matches!(source, ParameterSource::Path),
            documentation: None,
            type_name: None,
        }
    }

    /// Path parameter (always required)
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParameterSource::Path)
    }

    /// Query parameter (optional by default)
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterSource::Query)
    }

    /// Header parameter (optional by default)
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParameterSource::Header)
    }

    /// Body parameter (required by default)
    pub fn body(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            required: true,
            type_name: Some(type_name.clone()),
            ..Self::new(type_name, ParameterSource::Body)
        }
    }

    /// Set whether the parameter is required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the description
    pub fn documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Set the declared type name
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// Documentation of an action's response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescription {
    /// HTTP status code of the successful response
    pub status: u16,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Declared response type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
}

impl Default for ResponseDescription {
    fn default() -> Self {
        Self {
            status: 200,
            documentation: None,
            declared_type: None,
        }
    }
}

/// An attribute route declared on an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttribute {
    /// Template relative to the controller prefix (`~/` overrides the prefix)
    pub template: String,
    /// Optional route name
    pub name: Option<String>,
}

const JSON: &str = "application/json";

/// An action exposed by a controller
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    method: Method,
    name: String,
    controller: String,
    version_model: VersionModel,
    routes: Vec<RouteAttribute>,
    documentation: Option<String>,
    parameters: Vec<ParameterDescription>,
    response: Arc<ResponseDescription>,
    request_media_types: Vec<String>,
    response_media_types: Vec<String>,
}

impl ActionDescriptor {
    /// Create an action for an HTTP method
    pub fn new(method: Method, name: impl Into<String>) -> Self {
        Self {
            method,
            name: name.into(),
            controller: String::new(),
            version_model: VersionModel::neutral(),
            routes: Vec::new(),
            documentation: None,
            parameters: Vec::new(),
            response: Arc::new(ResponseDescription::default()),
            request_media_types: vec![JSON.to_string()],
            response_media_types: vec![JSON.to_string()],
        }
    }

    /// Add an attribute route
    pub fn route(mut self, template: impl Into<String>) -> Self {
        self.routes.push(RouteAttribute {
            template: template.into(),
            name: None,
        });
        self
    }

    /// Add a named attribute route
    pub fn named_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.push(RouteAttribute {
            template: template.into(),
            name: Some(name.into()),
        });
        self
    }

    /// Set the action documentation
    pub fn documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Declare a non-path parameter (path parameters come from the template)
    pub fn parameter(mut self, parameter: ParameterDescription) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the response description
    pub fn response(mut self, response: ResponseDescription) -> Self {
        self.response = Arc::new(response);
        self
    }

    /// Replace the supported request media types
    pub fn consumes(mut self, media_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.request_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the supported response media types
    pub fn produces(mut self, media_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.response_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Action name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning controller name
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// `Controller.Action`, used in diagnostics
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.controller, self.name)
    }

    /// Version model inherited from the owning controller
    pub fn version_model(&self) -> &VersionModel {
        &self.version_model
    }

    /// Attribute routes
    pub fn routes(&self) -> &[RouteAttribute] {
        &self.routes
    }

    /// Action documentation
    pub fn action_documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Declared non-path parameters
    pub fn parameters(&self) -> &[ParameterDescription] {
        &self.parameters
    }

    /// Response description
    pub fn response_description(&self) -> &Arc<ResponseDescription> {
        &self.response
    }

    /// Supported request media types
    pub fn request_media_types(&self) -> &[String] {
        &self.request_media_types
    }

    /// Supported response media types
    pub fn response_media_types(&self) -> &[String] {
        &self.response_media_types
    }
}

/// A controller grouping actions under a shared prefix and version model
#[derive(Debug, Clone)]
pub struct ControllerDescriptor {
    name: String,
    route_prefix: Option<String>,
    version_model: VersionModel,
    actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    /// Create a version-neutral controller
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            route_prefix: None,
            version_model: VersionModel::neutral(),
            actions: Vec::new(),
        }
    }

    /// Declare an API version
    ///
    /// # Errors
    ///
    /// Returns [`crate::VersioningError::InvalidVersionFormat`] when the
    /// version cannot be parsed.
    pub fn api_version(self, version: &str) -> Result<Self> {
        Ok(self.with_api_version(version.parse()?))
    }

    /// Declare an already parsed API version
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.version_model.push(version);
        self
    }

    /// Replace the version model
    pub fn version_model_from(mut self, model: VersionModel) -> Self {
        self.version_model = model;
        self
    }

    /// Mark the controller as version-neutral
    pub fn version_neutral(mut self) -> Self {
        self.version_model = VersionModel::neutral();
        self
    }

    /// Set the route prefix shared by all actions
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// Add an action
    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    /// Controller name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route prefix
    pub fn prefix(&self) -> Option<&str> {
        self.route_prefix.as_deref()
    }

    /// Version model
    pub fn version_model(&self) -> &VersionModel {
        &self.version_model
    }

    /// Actions in declaration order
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Finalize the actions, stamping the owning controller name and version
    /// model onto each
    pub fn into_actions(self) -> Vec<Arc<ActionDescriptor>> {
        let Self {
            name,
            version_model,
            actions,
            ..
        } = self;

        actions
            .into_iter()
            .map(|mut action| {
                action.controller = name.clone();
                action.version_model = version_model.clone();
                Arc::new(action)
            })
            .collect()
    }
}
