//! Agreements Example for URL path API versioning
//!
//! Three controllers serve the same agreements resource:
//! - `AgreementsV1` for 1.0
//! - `AgreementsV2` for 2.0
//! - `AgreementsV3` for 3.0 and 4.0 (3.0 is the default version)
//!
//! The example prints the expanded API descriptions, resolves a few request
//! paths to their actions and dumps the OpenAPI document.
//!
//! Run with: cargo run -p agreements-api
//! Options are read from `API_VERSIONING_*` variables (or a `.env` file), e.g.
//! `API_VERSIONING_PREFER_SHORT_HAND_VERSION=true cargo run -p agreements-api`

use http::Method;
use rustapi_versioning::{
    load_dotenv, ActionDescriptor, ApiConfiguration, ApiVersion, ApiVersioningOptions,
    ControllerDescriptor, ParameterDescription, ResponseDescription, ENV_PREFIX,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================
// Controllers
// ============================================

fn agreements(name: &str, versions: &[&str]) -> Result<ControllerDescriptor, BoxError> {
    let mut controller =
        ControllerDescriptor::new(name).route_prefix("api/v{version:apiVersion}/agreements");
    for version in versions {
        controller = controller.api_version(version)?;
    }

    Ok(controller
        .action(
            ActionDescriptor::new(Method::GET, "Get")
                .route("{accountId}")
                .documentation("Gets the agreement of an account")
                .parameter(ParameterDescription::query("format").documentation("Output format"))
                .response(ResponseDescription {
                    declared_type: Some("Agreement".to_string()),
                    ..Default::default()
                }),
        )
        .action(
            ActionDescriptor::new(Method::POST, "Create")
                .route("")
                .documentation("Creates an agreement")
                .parameter(ParameterDescription::body("NewAgreement"))
                .response(ResponseDescription {
                    status: 201,
                    declared_type: Some("Agreement".to_string()),
                    ..Default::default()
                }),
        ))
}

fn health() -> ControllerDescriptor {
    ControllerDescriptor::new("Health")
        .version_neutral()
        .action(ActionDescriptor::new(Method::GET, "Ping").route("health"))
}

// ============================================
// Options
// ============================================

fn options() -> Result<ApiVersioningOptions, BoxError> {
    load_dotenv();

    let options = ApiVersioningOptions::from_env()?;
    if std::env::var(format!("{ENV_PREFIX}DEFAULT_API_VERSION")).is_ok() {
        return Ok(options);
    }
    Ok(options.default_api_version(ApiVersion::new(3, 0)))
}

// ============================================
// Main
// ============================================

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agreements_api=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let mut config = ApiConfiguration::new();
    config
        .add_controller(agreements("AgreementsV1", &["1.0"])?)
        .add_controller(agreements("AgreementsV2", &["2.0"])?)
        .add_controller(agreements("AgreementsV3", &["3.0", "4.0"])?)
        .add_controller(health());
    config.add_api_versioning(options()?)?;

    let explorer = config.api_explorer()?;
    tracing::info!(
        routes = config.routes()?.len(),
        descriptions = explorer.api_descriptions().len(),
        "API versioning configured"
    );

    println!("API descriptions:");
    for description in explorer.api_descriptions() {
        let version = description
            .api_version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<7} /{:<40} {:<14} {}",
            description.method,
            description.relative_path,
            description.controller(),
            version
        );
    }

    println!("\nSelection:");
    let selector = config.action_selector()?;
    for path in [
        "/api/v1/agreements/42",
        "/api/v3.0/agreements/42",
        "/api/v4/agreements/42",
        "/api/agreements/42",
        "/api/v7/agreements/42",
        "/health",
    ] {
        match selector.select(&Method::GET, path) {
            Ok(selection) => println!("  GET {path:<26} -> {}", selection.action.display_name()),
            Err(error) => println!("  GET {path:<26} -> {error}"),
        }
    }

    let spec = rustapi_versioning::OpenApiSpec::from_descriptions(
        "Agreements API",
        "1.0",
        explorer.api_descriptions(),
    )
    .description("Agreements served through URL path API versioning");

    println!("\nOpenAPI:");
    println!("{}", serde_json::to_string_pretty(&spec.to_json())?);

    Ok(())
}
