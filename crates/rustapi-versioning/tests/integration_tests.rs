//! Integration tests for URL path API versioning
//!
//! These tests wire controllers through `ApiConfiguration` and check the
//! route table, the API explorer and action selection together.

use http::Method;
use rustapi_versioning::*;
use std::sync::Arc;

const PREFIX: &str = "api/v{version:apiVersion}/agreements";

fn agreements_controller(name: &str, versions: &[&str]) -> ControllerDescriptor {
    let mut controller = ControllerDescriptor::new(name).route_prefix(PREFIX);
    for version in versions {
        controller = controller.api_version(version).unwrap();
    }
    controller.action(
        ActionDescriptor::new(Method::GET, "Get")
            .route("{accountId}")
            .documentation("Gets the agreement of an account")
            .response(ResponseDescription {
                declared_type: Some("Agreement".to_string()),
                ..Default::default()
            }),
    )
}

fn agreements_configuration(options: ApiVersioningOptions) -> ApiConfiguration {
    let mut config = ApiConfiguration::new();
    config
        .add_controller(agreements_controller("AgreementsV1", &["1.0"]))
        .add_controller(agreements_controller("AgreementsV2", &["2.0"]))
        .add_controller(agreements_controller("AgreementsV3", &["3.0", "4.0"]));
    config
        .add_api_versioning(options.default_api_version(ApiVersion::new(3, 0)))
        .unwrap();
    config
}

fn summary(explorer: &ApiExplorer) -> Vec<(String, String)> {
    explorer
        .api_descriptions()
        .iter()
        .map(|d| (d.relative_path.clone(), d.controller().to_string()))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(path, controller)| (path.to_string(), controller.to_string()))
        .collect()
}

// ============================================================================
// API Explorer Tests
// ============================================================================

mod explorer_tests {
    use super::*;

    #[test]
    fn test_agreements_descriptions() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let explorer = config.api_explorer().unwrap();

        assert_eq!(
            summary(&explorer),
            pairs(&[
                ("api/v1.0/agreements/{accountId}", "AgreementsV1"),
                ("api/v2.0/agreements/{accountId}", "AgreementsV2"),
                ("api/v3.0/agreements/{accountId}", "AgreementsV3"),
                ("api/v4.0/agreements/{accountId}", "AgreementsV3"),
                ("api/agreements/{accountId}", "AgreementsV3"),
            ])
        );
    }

    #[test]
    fn test_agreements_descriptions_without_default_version() {
        let mut config =
            agreements_configuration(ApiVersioningOptions::new().include_default_version(false));
        let explorer = config.api_explorer().unwrap();

        assert_eq!(
            summary(&explorer),
            pairs(&[
                ("api/v1.0/agreements/{accountId}", "AgreementsV1"),
                ("api/v2.0/agreements/{accountId}", "AgreementsV2"),
                ("api/v3.0/agreements/{accountId}", "AgreementsV3"),
                ("api/v4.0/agreements/{accountId}", "AgreementsV3"),
            ])
        );
    }

    #[test]
    fn test_agreements_descriptions_with_short_hand_versions() {
        let mut config = agreements_configuration(
            ApiVersioningOptions::new()
                .include_default_version(false)
                .prefer_short_hand_version(true),
        );
        let explorer = config.api_explorer().unwrap();

        assert_eq!(
            summary(&explorer),
            pairs(&[
                ("api/v1/agreements/{accountId}", "AgreementsV1"),
                ("api/v2/agreements/{accountId}", "AgreementsV2"),
                ("api/v3/agreements/{accountId}", "AgreementsV3"),
                ("api/v4/agreements/{accountId}", "AgreementsV3"),
            ])
        );
    }

    #[test]
    fn test_descriptions_drop_version_parameter() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let explorer = config.api_explorer().unwrap();

        for description in explorer.api_descriptions() {
            let names: Vec<_> = description.parameters.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["accountId"]);
            assert_eq!(
                description.documentation.as_deref(),
                Some("Gets the agreement of an account")
            );
        }
    }

    #[test]
    fn test_descriptions_per_version() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let explorer = config.api_explorer().unwrap();

        let v3: Vec<_> = explorer
            .descriptions_for(&ApiVersion::new(3, 0))
            .into_iter()
            .map(|d| d.relative_path.as_str())
            .collect();
        assert_eq!(v3, vec!["api/v3.0/agreements/{accountId}", "api/agreements/{accountId}"]);
        assert_eq!(explorer.api_versions().len(), 4);
    }

    #[test]
    fn test_version_query_parameter_is_not_described() {
        let mut config = ApiConfiguration::new();
        config.add_controller(
            ControllerDescriptor::new("Search")
                .api_version("1.0")
                .unwrap()
                .action(
                    ActionDescriptor::new(Method::GET, "Find")
                        .route("api/v{version:apiVersion}/search")
                        .parameter(ParameterDescription::query("version")),
                ),
        );
        config.add_api_versioning(ApiVersioningOptions::new()).unwrap();

        let explorer = config.api_explorer().unwrap();
        assert_eq!(explorer.api_descriptions().len(), 2);
        for description in explorer.api_descriptions() {
            let leaked: Vec<_> = description
                .parameters
                .iter()
                .filter(|p| p.name.eq_ignore_ascii_case("version"))
                .map(|p| (p.name.as_str(), p.source))
                .collect();
            assert!(leaked.is_empty(), "{}: {leaked:?}", description.relative_path);
        }
    }

    #[test]
    fn test_explorer_hook_without_url_versioning() {
        let mut config = ApiConfiguration::new();
        config.add_controller(agreements_controller("AgreementsV1", &["1.0"]));
        config.add_api_versioning_aware_explorer(|_| {}).unwrap();

        // Routes are not version constrained, so descriptions pass through
        let explorer = config.api_explorer().unwrap();
        assert!(explorer.is_version_aware());
        assert_eq!(
            summary(&explorer),
            pairs(&[("api/v{version}/agreements/{accountId}", "AgreementsV1")])
        );
    }

    #[test]
    fn test_custom_description_provider() {
        struct Documented;

        impl DescriptionProvider for Documented {
            fn describe(&self, routes: &[Arc<RouteEntry>]) -> Vec<DescriptionEntry> {
                DefaultDescriptionProvider
                    .describe(routes)
                    .into_iter()
                    .map(|mut entry| {
                        entry.documentation = Some(Arc::from("custom"));
                        entry
                    })
                    .collect()
            }
        }

        let mut config = agreements_configuration(ApiVersioningOptions::new());
        config.set_description_provider(Arc::new(Documented));
        let explorer = config.api_explorer().unwrap();

        assert_eq!(explorer.api_descriptions().len(), 5);
        assert!(explorer
            .api_descriptions()
            .iter()
            .all(|d| d.documentation.as_deref() == Some("custom")));
    }
}

// ============================================================================
// Route Table Tests
// ============================================================================

mod route_tests {
    use super::*;

    #[test]
    fn test_registered_routes() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());

        let templates: Vec<_> = config
            .routes()
            .unwrap()
            .iter()
            .map(|r| (r.template().to_string(), r.is_default_version()))
            .collect();
        assert_eq!(
            templates,
            vec![
                ("api/v{version:apiVersion}/agreements/{accountId}".to_string(), false),
                ("api/v{version:apiVersion}/agreements/{accountId}".to_string(), false),
                ("api/v{version:apiVersion}/agreements/{accountId}".to_string(), false),
                ("api/agreements/{accountId}".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_expanded_routes() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());

        let paths: Vec<_> = config
            .expanded_routes()
            .unwrap()
            .iter()
            .map(|r| r.path(VersionFormat::ShortHand))
            .collect();
        assert_eq!(
            paths,
            vec![
                "api/v1/agreements/{accountId}",
                "api/v2/agreements/{accountId}",
                "api/v3/agreements/{accountId}",
                "api/v4/agreements/{accountId}",
                "api/agreements/{accountId}",
            ]
        );
    }

    #[test]
    fn test_no_default_routes_when_not_assumed() {
        let mut config = agreements_configuration(
            ApiVersioningOptions::new().assume_default_version_when_unspecified(false),
        );

        assert_eq!(config.routes().unwrap().len(), 3);
        assert_eq!(config.api_explorer().unwrap().api_descriptions().len(), 4);
    }

    #[test]
    fn test_version_neutral_controller() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        config.add_controller(
            ControllerDescriptor::new("Health")
                .version_neutral()
                .action(ActionDescriptor::new(Method::GET, "Ping").route("health")),
        );

        let explorer = config.api_explorer().unwrap();
        let last = explorer.api_descriptions().last().unwrap();
        assert_eq!(last.relative_path, "health");
        assert!(last.api_version.is_none());
        assert_eq!(explorer.descriptions_for(&ApiVersion::new(1, 0)).len(), 2);
    }
}

// ============================================================================
// Action Selection Tests
// ============================================================================

mod selection_tests {
    use super::*;

    #[test]
    fn test_select_v3_controller() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let selector = config.action_selector().unwrap();

        for path in [
            "/api/v3/agreements/test",
            "/api/v3.0/agreements/test",
            "/api/v4/agreements/test",
            "/api/v4.0/agreements/test",
            "/api/agreements/test",
        ] {
            let selection = selector.select(&Method::GET, path).unwrap();
            assert_eq!(selection.action.controller(), "AgreementsV3", "path: {path}");
            assert_eq!(selection.values.get("accountId"), Some("test"));
        }
    }

    #[test]
    fn test_select_older_controllers() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let selector = config.action_selector().unwrap();

        let v1 = selector.select(&Method::GET, "/api/v1/agreements/test").unwrap();
        assert_eq!(v1.action.controller(), "AgreementsV1");

        let v2 = selector.select(&Method::GET, "/api/v2.0/agreements/test").unwrap();
        assert_eq!(v2.action.controller(), "AgreementsV2");
    }

    #[test]
    fn test_select_unsupported_version() {
        let mut config = agreements_configuration(ApiVersioningOptions::new());
        let selector = config.action_selector().unwrap();

        assert!(matches!(
            selector.select(&Method::GET, "/api/v9/agreements/test"),
            Err(SelectionError::UnsupportedApiVersion { .. })
        ));
    }

    #[test]
    fn test_no_default_route_without_assumption() {
        let mut config = agreements_configuration(
            ApiVersioningOptions::new().assume_default_version_when_unspecified(false),
        );
        let selector = config.action_selector().unwrap();

        assert!(matches!(
            selector.select(&Method::GET, "/api/agreements/test"),
            Err(SelectionError::NoMatchingRoute { .. })
        ));
    }
}

// ============================================================================
// OpenAPI Tests
// ============================================================================

mod openapi_tests {
    use super::*;

    #[test]
    fn test_openapi_document_from_explorer() {
        let mut config = agreements_configuration(
            ApiVersioningOptions::new().prefer_short_hand_version(true),
        );
        let explorer = config.api_explorer().unwrap();

        let json = OpenApiSpec::from_descriptions("Agreements", "1.0", explorer.api_descriptions())
            .to_json();

        let paths = json["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 5);
        assert!(paths.contains_key("/api/v4/agreements/{accountId}"));
        assert_eq!(
            json["paths"]["/api/v3/agreements/{accountId}"]["get"]["tags"][0],
            "AgreementsV3"
        );
        assert_eq!(
            json["paths"]["/api/agreements/{accountId}"]["get"]["responses"]["200"]["content"]
                ["application/json"]["schema"]["$ref"],
            "#/components/schemas/Agreement"
        );
    }
}
