//! Inline route constraints
//!
//! Route templates may attach constraints to parameters, e.g.
//! `{version:apiVersion}` or `{id:int:min(1)}`. An [`InlineConstraintResolver`]
//! turns the constraint names into [`RouteConstraint`] values. The
//! [`RouteConstraint::ApiVersion`] constraint is what marks a parameter as
//! the version placeholder of a template.

use crate::version::ApiVersion;
use std::collections::HashMap;
use std::fmt;

/// Constraint attached to a route parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteConstraint {
    /// Value must be a valid API version; marks the version placeholder
    ApiVersion,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// ASCII letters only
    Alpha,
    /// `true` or `false`
    Bool,
    /// Integer greater than or equal to the bound
    Min(i64),
    /// Integer less than or equal to the bound
    Max(i64),
    /// String length within bounds (inclusive)
    Length(usize, usize),
}

impl RouteConstraint {
    /// Check whether a raw route value satisfies the constraint
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::ApiVersion => value.parse::<ApiVersion>().is_ok(),
            Self::Int => value.parse::<i32>().is_ok(),
            Self::Long => value.parse::<i64>().is_ok(),
            Self::Alpha => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
            Self::Bool => value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"),
            Self::Min(min) => value.parse::<i64>().map(|v| v >= *min).unwrap_or(false),
            Self::Max(max) => value.parse::<i64>().map(|v| v <= *max).unwrap_or(false),
            Self::Length(min, max) => {
                let len = value.chars().count();
                len >= *min && len <= *max
            }
        }
    }

    /// Whether this is the API version constraint
    pub fn is_api_version(&self) -> bool {
        matches!(self, Self::ApiVersion)
    }
}

impl fmt::Display for RouteConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiVersion => write!(f, "apiVersion"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Alpha => write!(f, "alpha"),
            Self::Bool => write!(f, "bool"),
            Self::Min(min) => write!(f, "min({min})"),
            Self::Max(max) => write!(f, "max({max})"),
            Self::Length(min, max) if min == max => write!(f, "length({min})"),
            Self::Length(min, max) => write!(f, "length({min},{max})"),
        }
    }
}

/// Resolves inline constraint names to route constraints
///
/// Implement this to support custom constraint names. Returning `None`
/// makes template parsing fail with an unknown-constraint error.
pub trait InlineConstraintResolver: Send + Sync {
    /// Resolve a constraint by name with its optional argument text
    fn resolve(&self, name: &str, args: Option<&str>) -> Option<RouteConstraint>;
}

/// Built-in constraint names understood by [`DefaultConstraintResolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintKind {
    ApiVersion,
    Int,
    Long,
    Alpha,
    Bool,
    Min,
    Max,
    Length,
}

/// Default constraint resolver
///
/// Understands `apiVersion`, `int`, `long`, `alpha`, `bool`, `min(n)`,
/// `max(n)`, `length(n)` and `length(min,max)`. Names are case-insensitive.
#[derive(Debug, Clone)]
pub struct DefaultConstraintResolver {
    map: HashMap<String, ConstraintKind>,
}

impl DefaultConstraintResolver {
    /// Create a resolver with the built-in constraint map
    pub fn new() -> Self {
        let map = [
            ("apiversion", ConstraintKind::ApiVersion),
            ("int", ConstraintKind::Int),
            ("long", ConstraintKind::Long),
            ("alpha", ConstraintKind::Alpha),
            ("bool", ConstraintKind::Bool),
            ("min", ConstraintKind::Min),
            ("max", ConstraintKind::Max),
            ("length", ConstraintKind::Length),
        ]
        .into_iter()
        .map(|(name, kind)| (name.to_string(), kind))
        .collect();

        Self { map }
    }

    /// Map an additional constraint name to the API version constraint
    pub fn with_version_constraint(mut self, name: impl AsRef<str>) -> Self {
        self.map
            .insert(name.as_ref().to_ascii_lowercase(), ConstraintKind::ApiVersion);
        self
    }
}

impl Default for DefaultConstraintResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineConstraintResolver for DefaultConstraintResolver {
    fn resolve(&self, name: &str, args: Option<&str>) -> Option<RouteConstraint> {
        let kind = *self.map.get(&name.to_ascii_lowercase())?;
        let int_arg = || args?.trim().parse::<i64>().ok();

        match (kind, args) {
            (ConstraintKind::ApiVersion, None) => Some(RouteConstraint::ApiVersion),
            (ConstraintKind::Int, None) => Some(RouteConstraint::Int),
            (ConstraintKind::Long, None) => Some(RouteConstraint::Long),
            (ConstraintKind::Alpha, None) => Some(RouteConstraint::Alpha),
            (ConstraintKind::Bool, None) => Some(RouteConstraint::Bool),
            (ConstraintKind::Min, Some(_)) => int_arg().map(RouteConstraint::Min),
            (ConstraintKind::Max, Some(_)) => int_arg().map(RouteConstraint::Max),
            (ConstraintKind::Length, Some(args)) => {
                let bounds: Vec<Option<usize>> =
                    args.split(',').map(|a| a.trim().parse().ok()).collect();
                match bounds.as_slice() {
                    [Some(exact)] => Some(RouteConstraint::Length(*exact, *exact)),
                    [Some(min), Some(max)] if min <= max => {
                        Some(RouteConstraint::Length(*min, *max))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
