//! Version-aware API explorer
//!
//! The explorer asks a [`DescriptionProvider`] for the raw, version-unaware
//! descriptions of every registered route and expands them into one
//! description per declared version. The result is computed once, on first
//! access, and shared by every reader afterwards.

use crate::action::{ParameterDescription, ParameterSource};
use crate::config::ExplorerOptions;
use crate::description::{DescriptionEntry, DescriptionProvider};
use crate::routes::RouteEntry;
use crate::template::replace_parameter_tokens;
use crate::version::ApiVersion;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Expand raw descriptions into per-version descriptions
///
/// For each raw entry, in order:
/// - Entries whose route carries no version constraint, or whose action is
///   version-neutral, are kept as they are. Default-version entries are
///   dropped when `include_default_version` is off, and otherwise lose the
///   parameters named after the placeholder their route no longer has.
/// - Version-constrained entries yield one entry per declared version, in
///   declaration order. The version placeholder tokens in the path are
///   replaced by the formatted version and URL-bound (path or query)
///   parameters named after a placeholder are removed. Every other field
///   is shared with the raw entry.
///
/// The output only depends on the input and the options.
pub fn build_versioned_descriptions(
    raw: &[DescriptionEntry],
    options: &ExplorerOptions,
) -> Vec<DescriptionEntry> {
    let format = options.version_format();
    let mut descriptions = Vec::with_capacity(raw.len());

    for entry in raw {
        let names = entry.route.version_parameters();
        let model = entry.action().version_model();

        if names.is_empty() || model.is_neutral() {
            if entry.is_default_version() && !options.include_default_version {
                trace!(path = %entry.relative_path, "Skipped default version description");
                continue;
            }
            let removed = entry.route.removed_parameters();
            if removed.is_empty() {
                descriptions.push(entry.clone());
            } else {
                descriptions.push(DescriptionEntry {
                    parameters: without_version_parameters(&entry.parameters, removed),
                    ..entry.clone()
                });
            }
            continue;
        }

        let parameters = without_version_parameters(&entry.parameters, names);

        for version in model.declared() {
            let relative_path =
                replace_parameter_tokens(&entry.relative_path, names, &version.format(format));
            trace!(method = %entry.method, path = %relative_path, "Expanded description");

            descriptions.push(DescriptionEntry {
                relative_path,
                parameters: parameters.clone(),
                api_version: Some(version.clone()),
                ..entry.clone()
            });
        }
    }

    descriptions
}

/// Drop URL-bound parameters named after a version placeholder
fn without_version_parameters(
    parameters: &[ParameterDescription],
    names: &[String],
) -> Vec<ParameterDescription> {
    parameters
        .iter()
        .filter(|p| {
            !(matches!(p.source, ParameterSource::Path | ParameterSource::Query)
                && names.iter().any(|name| name.eq_ignore_ascii_case(&p.name)))
        })
        .cloned()
        .collect()
}

/// Lazily materialized API descriptions
///
/// Without [`ExplorerOptions`] the explorer is not version-aware and lists
/// the raw descriptions unchanged.
pub struct ApiExplorer {
    routes: Vec<Arc<RouteEntry>>,
    provider: Arc<dyn DescriptionProvider>,
    options: Option<ExplorerOptions>,
    descriptions: OnceLock<Vec<DescriptionEntry>>,
}

impl ApiExplorer {
    /// Create an explorer over a snapshot of the registered routes
    pub fn new(
        routes: Vec<Arc<RouteEntry>>,
        provider: Arc<dyn DescriptionProvider>,
        options: Option<ExplorerOptions>,
    ) -> Self {
        Self {
            routes,
            provider,
            options,
            descriptions: OnceLock::new(),
        }
    }

    /// Whether descriptions are expanded per version
    pub fn is_version_aware(&self) -> bool {
        self.options.is_some()
    }

    /// Explorer options, if version-aware
    pub fn options(&self) -> Option<&ExplorerOptions> {
        self.options.as_ref()
    }

    /// Routes the descriptions are built from
    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        &self.routes
    }

    /// All descriptions, computed on first access
    pub fn api_descriptions(&self) -> &[DescriptionEntry] {
        self.descriptions.get_or_init(|| {
            let raw = self.provider.describe(&self.routes);
            let descriptions = match &self.options {
                Some(options) => build_versioned_descriptions(&raw, options),
                None => raw,
            };
            debug!(
                routes = self.routes.len(),
                descriptions = descriptions.len(),
                options = ?self.options,
                "Materialized API descriptions"
            );
            descriptions
        })
    }

    /// Descriptions of the operations reachable with `version`
    pub fn descriptions_for(&self, version: &ApiVersion) -> Vec<&DescriptionEntry> {
        self.api_descriptions()
            .iter()
            .filter(|d| d.applies_to(version))
            .collect()
    }

    /// Distinct versions of the expanded descriptions, ascending
    pub fn api_versions(&self) -> Vec<ApiVersion> {
        let mut versions: Vec<ApiVersion> = self
            .api_descriptions()
            .iter()
            .filter_map(|d| d.api_version.clone())
            .collect();
        versions.sort();
        versions.dedup();
        versions
    }
}

impl fmt::Debug for ApiExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiExplorer")
            .field("routes", &self.routes.len())
            .field("options", &self.options)
            .field("materialized", &self.descriptions.get().is_some())
            .finish_non_exhaustive()
    }
}
