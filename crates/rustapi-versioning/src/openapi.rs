//! OpenAPI rendering of API descriptions
//!
//! Turns the (versioned) description list into an OpenAPI 3.0.3 document.
//! Schemas are referenced by declared type name only; no schema derivation
//! happens here.

use crate::action::{ParameterDescription, ParameterSource};
use crate::description::DescriptionEntry;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// API information for the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    /// API title
    pub title: String,
    /// Document version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI document
#[derive(Debug, Clone)]
pub struct OpenApiSpec {
    /// Document information
    pub info: ApiInfo,
    /// Path items keyed by path
    pub paths: BTreeMap<String, PathItem>,
}

/// Path item in the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathItem {
    /// GET operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// PATCH operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// DELETE operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// HEAD operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// OPTIONS operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
}

impl PathItem {
    fn slot(&mut self, method: &Method) -> Option<&mut Option<Operation>> {
        match method.as_str() {
            "GET" => Some(&mut self.get),
            "POST" => Some(&mut self.post),
            "PUT" => Some(&mut self.put),
            "PATCH" => Some(&mut self.patch),
            "DELETE" => Some(&mut self.delete),
            "HEAD" => Some(&mut self.head),
            "OPTIONS" => Some(&mut self.options),
            _ => None,
        }
    }

    /// Operation documented for `method`
    pub fn operation(&self, method: &Method) -> Option<&Operation> {
        match method.as_str() {
            "GET" => self.get.as_ref(),
            "POST" => self.post.as_ref(),
            "PUT" => self.put.as_ref(),
            "PATCH" => self.patch.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "HEAD" => self.head.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            _ => None,
        }
    }
}

/// Operation (endpoint) in the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// `Controller_Action_vX.Y`
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Operation documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Controller name
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    /// Path, query and header parameters
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    /// Body parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code
    pub responses: BTreeMap<String, ResponseSpec>,
}

/// Parameter in the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// `path`, `query` or `header`
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Parameter documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value schema
    pub schema: SchemaRef,
}

/// Request body in the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    /// Whether a body is required
    pub required: bool,
    /// Schemas keyed by media type
    pub content: BTreeMap<String, MediaType>,
}

/// Media type in the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    /// Body schema
    pub schema: SchemaRef,
}

/// Response specification
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResponseSpec {
    /// Response documentation
    pub description: String,
    /// Schemas keyed by media type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

/// Schema reference or inline schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// `$ref` to a component schema
    Ref {
        /// Reference target
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline schema
    Inline(serde_json::Value),
}

impl SchemaRef {
    /// Inline schema for primitive type names, component reference otherwise
    pub fn for_type(type_name: Option<&str>) -> Self {
        match type_name.unwrap_or("string") {
            primitive @ ("string" | "integer" | "number" | "boolean") => {
                Self::Inline(serde_json::json!({ "type": primitive }))
            }
            name => Self::Ref {
                reference: format!("#/components/schemas/{name}"),
            },
        }
    }
}

impl OpenApiSpec {
    /// Create an empty document
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ApiInfo {
                title: title.into(),
                version: version.into(),
                description: None,
            },
            paths: BTreeMap::new(),
        }
    }

    /// Build a document from API descriptions
    ///
    /// Paths gain a leading `/`. When two descriptions share a path and
    /// method, the later one wins.
    pub fn from_descriptions(
        title: impl Into<String>,
        version: impl Into<String>,
        descriptions: &[DescriptionEntry],
    ) -> Self {
        descriptions
            .iter()
            .fold(Self::new(title, version), |spec, entry| spec.describe(entry))
    }

    /// Set description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.info.description = Some(desc.into());
        self
    }

    /// Add one description
    pub fn describe(self, entry: &DescriptionEntry) -> Self {
        let path = format!("/{}", entry.relative_path);
        self.path(&path, &entry.method, Operation::from_description(entry))
    }

    /// Add a path operation
    pub fn path(mut self, path: &str, method: &Method, operation: Operation) -> Self {
        let item = self.paths.entry(path.to_string()).or_default();
        match item.slot(method) {
            Some(slot) => {
                if slot.is_some() {
                    warn!(path, method = %method, "Overwriting documented operation");
                }
                *slot = Some(operation);
            }
            None => warn!(path, method = %method, "Method cannot be documented"),
        }
        self
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "openapi": "3.0.3",
            "info": self.info,
            "paths": self.paths,
        })
    }
}

impl Operation {
    /// Build an operation from a description
    pub fn from_description(entry: &DescriptionEntry) -> Self {
        let action = entry.action();
        let operation_id = match &entry.api_version {
            Some(version) => format!("{}_{}_v{}", action.controller(), action.name(), version),
            None if entry.is_default_version() => {
                format!("{}_{}_default", action.controller(), action.name())
            }
            None => format!("{}_{}", action.controller(), action.name()),
        };

        let (body, parameters): (Vec<&ParameterDescription>, Vec<&ParameterDescription>) = entry
            .parameters
            .iter()
            .partition(|p| p.source == ParameterSource::Body);

        let request_body = body.first().map(|body| RequestBody {
            required: body.required,
            content: entry
                .request_formatters
                .iter()
                .map(|media| {
                    (
                        media.clone(),
                        MediaType {
                            schema: SchemaRef::for_type(body.type_name.as_deref()),
                        },
                    )
                })
                .collect(),
        });

        let response = &entry.response;
        let content = response.declared_type.as_deref().map(|declared| {
            entry
                .response_formatters
                .iter()
                .map(|media| {
                    (
                        media.clone(),
                        MediaType {
                            schema: SchemaRef::for_type(Some(declared)),
                        },
                    )
                })
                .collect()
        });

        Self {
            operation_id,
            description: entry.documentation.as_deref().map(str::to_string),
            tags: vec![action.controller().to_string()],
            parameters: parameters.into_iter().map(Parameter::from_description).collect(),
            request_body,
            responses: BTreeMap::from([(
                response.status.to_string(),
                ResponseSpec {
                    description: response
                        .documentation
                        .clone()
                        .unwrap_or_else(|| "Successful response".to_string()),
                    content,
                },
            )]),
        }
    }
}

impl Parameter {
    fn from_description(param: &ParameterDescription) -> Self {
        let location = match param.source {
            ParameterSource::Path => "path",
            ParameterSource::Query => "query",
            ParameterSource::Header => "header",
            ParameterSource::Body => "body",
        };

        Self {
            name: param.name.clone(),
            location: location.to_string(),
            // OpenAPI requires path parameters
            required: param.required || param.source == ParameterSource::Path,
            description: param.documentation.clone(),
            schema: SchemaRef::for_type(param.type_name.as_deref()),
        }
    }
}
