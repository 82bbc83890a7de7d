//! Property tests for route and description expansion
//!
//! These tests verify that:
//! - Route expansion yields one route per declared version, plus one default
//!   route exactly when the default version is declared
//! - Description expansion is deterministic
//! - No version parameter survives description expansion
//! - Version formatting parses back to an equivalent version

#[cfg(test)]
mod tests {
    use crate::*;
    use http::Method;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn versions_strategy() -> impl Strategy<Value = Vec<ApiVersion>> {
        prop::collection::btree_set((0u32..20, 0u32..4), 1..6).prop_map(|set| {
            set.into_iter()
                .map(|(major, minor)| ApiVersion::new(major, minor))
                .collect()
        })
    }

    fn template_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("[a-z][a-z0-9]{0,5}", 0..3),
            prop::sample::select(vec!["", "v", "ver"]),
            prop::collection::vec("[a-z][a-z0-9]{0,5}", 0..3),
        )
            .prop_map(|(prefix, literal, suffix)| {
                let mut segments = prefix;
                segments.push(format!("{literal}{{version:apiVersion}}"));
                segments.extend(suffix);
                segments.push("{id}".to_string());
                segments.join("/")
            })
    }

    fn action(versions: &[ApiVersion], template: &str) -> Arc<ActionDescriptor> {
        versions
            .iter()
            .cloned()
            .fold(ControllerDescriptor::new("Things"), |c, v| c.with_api_version(v))
            .action(
                ActionDescriptor::new(Method::GET, "Get")
                    .route(template)
                    .parameter(ParameterDescription::query("filter"))
                    .parameter(ParameterDescription::query("version")),
            )
            .into_actions()
            .remove(0)
    }

    fn expand(
        versions: &[ApiVersion],
        default: &ApiVersion,
        template: &str,
    ) -> Vec<ExpandedRoute> {
        let action = action(versions, template);
        let base = [BaseRoute::new(template.parse().unwrap())];
        RouteExpander::new(default.clone()).expand(&action, &base)
    }

    type Fingerprint = Vec<(String, Option<ApiVersion>, Vec<String>)>;

    fn fingerprint(descriptions: &[DescriptionEntry]) -> Fingerprint {
        descriptions
            .iter()
            .map(|d| {
                (
                    d.relative_path.clone(),
                    d.api_version.clone(),
                    d.parameters.iter().map(|p| p.name.clone()).collect(),
                )
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: n declared versions with the default among them give n + 1
        /// routes, exactly one of them a default route without the placeholder
        #[test]
        fn prop_default_version_action_gets_n_plus_one_routes(
            versions in versions_strategy(),
            template in template_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            let default = pick.get(&versions).clone();
            let routes = expand(&versions, &default, &template);

            prop_assert_eq!(routes.len(), versions.len() + 1);

            let defaults: Vec<_> = routes.iter().filter(|r| r.is_default_version()).collect();
            prop_assert_eq!(defaults.len(), 1);
            prop_assert!(defaults[0].entry().template().version_parameters().is_empty());
            let placeholder_left = defaults[0].path(VersionFormat::Long).contains("{version}");
            prop_assert!(!placeholder_left);

            for route in routes.iter().filter(|r| !r.is_default_version()) {
                let parameters = route.entry().template().version_parameters();
                prop_assert_eq!(parameters, vec!["version".to_string()]);
            }
        }

        /// Property: without the default version, n declared versions give n routes
        #[test]
        fn prop_other_actions_get_n_routes(
            versions in versions_strategy(),
            template in template_strategy(),
        ) {
            let default = ApiVersion::new(99, 0);
            let routes = expand(&versions, &default, &template);

            prop_assert_eq!(routes.len(), versions.len());
            prop_assert!(routes.iter().all(|r| !r.is_default_version()));

            let bound: Vec<_> = routes
                .iter()
                .map(|r| r.version().clone())
                .collect();
            let expected: Vec<_> = versions.iter().cloned().map(RouteVersion::Specific).collect();
            prop_assert_eq!(bound, expected);
        }

        /// Property: expanding the same raw descriptions twice yields the same list
        #[test]
        fn prop_description_expansion_is_deterministic(
            versions in versions_strategy(),
            template in template_strategy(),
            pick in any::<prop::sample::Index>(),
            include_default_version in any::<bool>(),
            prefer_short_hand_version in any::<bool>(),
        ) {
            let default = pick.get(&versions).clone();
            let routes = registered_entries(&expand(&versions, &default, &template));
            let raw = DefaultDescriptionProvider.describe(&routes);
            let options = ExplorerOptions {
                include_default_version,
                prefer_short_hand_version,
            };

            let first = build_versioned_descriptions(&raw, &options);
            let second = build_versioned_descriptions(&raw, &options);
            prop_assert_eq!(fingerprint(&first), fingerprint(&second));

            let expected = versions.len() + usize::from(include_default_version);
            prop_assert_eq!(first.len(), expected);
        }

        /// Property: no description keeps a parameter bound to the version placeholder
        #[test]
        fn prop_no_version_parameter_after_expansion(
            versions in versions_strategy(),
            template in template_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            let default = pick.get(&versions).clone();
            let routes = registered_entries(&expand(&versions, &default, &template));
            let raw = DefaultDescriptionProvider.describe(&routes);

            for description in build_versioned_descriptions(&raw, &ExplorerOptions::default()) {
                prop_assert!(description.parameters.iter().all(|p| p.name != "version"));
                let placeholder_left = description.relative_path.contains("{version}");
                prop_assert!(!placeholder_left);
                prop_assert!(description.parameters.iter().any(|p| p.name == "filter"));
            }
        }

        /// Property: both formats parse back to an equivalent version
        #[test]
        fn prop_formatted_versions_parse_back(
            major in proptest::option::of(0u32..1000),
            minor in 0u32..1000,
        ) {
            let version = ApiVersion { major, minor: Some(minor), status: None };

            for format in [VersionFormat::Long, VersionFormat::ShortHand] {
                let parsed: ApiVersion = version.format(format).parse().unwrap();
                prop_assert!(parsed.is_equivalent_to(&version));
            }
        }

        /// Property: ordering follows (major, minor) for fully specified versions
        #[test]
        fn prop_ordering_matches_components(
            a in (0u32..50, 0u32..50),
            b in (0u32..50, 0u32..50),
        ) {
            let left = ApiVersion::new(a.0, a.1);
            let right = ApiVersion::new(b.0, b.1);
            prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }
    }
}
