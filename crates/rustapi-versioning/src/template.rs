//! Route template parsing
//!
//! Templates follow the attribute-routing syntax of the host framework:
//!
//! - `api/agreements` - Static path
//! - `api/agreements/{accountId}` - Single parameter
//! - `api/v{version:apiVersion}/agreements` - Parameter with literal prefix and constraint
//! - `files/{*path}` - Catch-all parameter (last segment only)
//! - `items/{id:int?}` - Optional parameter (last segment only)
//!
//! A template is kept as an ordered list of segments, each made of literal
//! and parameter parts, so that operations like removing the version segment
//! work on parsed parts and never on substrings.

use crate::constraint::{DefaultConstraintResolver, InlineConstraintResolver, RouteConstraint};
use crate::error::{Result, VersioningError};
use std::fmt;
use std::str::FromStr;

/// A parsed route template
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
}

/// One `/`-separated segment of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    parts: Vec<SegmentPart>,
}

/// A literal run or a parameter inside a segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPart {
    /// Literal text, matched case-insensitively
    Literal(String),
    /// Named placeholder
    Parameter(Parameter),
}

/// A named placeholder with its inline constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Resolved inline constraints
    pub constraints: Vec<RouteConstraint>,
    /// `{name?}`
    pub optional: bool,
    /// `{*name}`
    pub catch_all: bool,
}

impl Parameter {
    /// Whether the parameter carries the API version constraint
    pub fn is_version(&self) -> bool {
        self.constraints.iter().any(RouteConstraint::is_api_version)
    }

    /// Check a raw value against every constraint
    pub fn accepts(&self, value: &str) -> bool {
        self.constraints.iter().all(|c| c.accepts(value))
    }
}

impl Segment {
    /// Parts of this segment in order
    pub fn parts(&self) -> &[SegmentPart] {
        &self.parts
    }

    /// Parameters of this segment in order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parts.iter().filter_map(|part| match part {
            SegmentPart::Parameter(p) => Some(p),
            SegmentPart::Literal(_) => None,
        })
    }

    /// Whether one of the parts is a parameter named `name`
    pub fn holds_parameter(&self, name: &str) -> bool {
        self.parameters().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn sole_parameter(&self) -> Option<&Parameter> {
        match self.parts.as_slice() {
            [SegmentPart::Parameter(p)] => Some(p),
            _ => None,
        }
    }

    fn match_into(&self, raw: &str, values: &mut RouteValues) -> Option<()> {
        let mut rest = raw;
        let mut parts = self.parts.iter().peekable();

        while let Some(part) = parts.next() {
            match part {
                SegmentPart::Literal(literal) => {
                    let head = rest.get(..literal.len())?;
                    if !head.eq_ignore_ascii_case(literal) {
                        return None;
                    }
                    rest = &rest[literal.len()..];
                }
                SegmentPart::Parameter(param) => {
                    let end = match parts.peek() {
                        Some(SegmentPart::Literal(next)) => find_ignore_case(rest, next)?,
                        _ => rest.len(),
                    };
                    let value = &rest[..end];
                    if value.is_empty() || !param.accepts(value) {
                        return None;
                    }
                    values.push(&param.name, value);
                    rest = &rest[end..];
                }
            }
        }

        rest.is_empty().then_some(())
    }

    fn render(&self, f: &mut impl fmt::Write, with_constraints: bool) -> fmt::Result {
        for part in &self.parts {
            match part {
                SegmentPart::Literal(literal) => f.write_str(literal)?,
                SegmentPart::Parameter(param) => {
                    f.write_char('{')?;
                    if with_constraints && param.catch_all {
                        f.write_char('*')?;
                    }
                    f.write_str(&param.name)?;
                    if with_constraints {
                        for constraint in &param.constraints {
                            write!(f, ":{constraint}")?;
                        }
                        if param.optional {
                            f.write_char('?')?;
                        }
                    }
                    f.write_char('}')?;
                }
            }
        }
        Ok(())
    }
}

/// Values captured while matching a request path against a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues {
    values: Vec<(String, String)>,
}

impl RouteValues {
    /// Get a captured value by parameter name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over captured `(name, value)` pairs in template order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }
}

impl RouteTemplate {
    /// Parse a template, resolving inline constraints with `resolver`
    ///
    /// A leading `/` or `~/` and a trailing `/` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`VersioningError::InvalidRouteTemplate`] for syntax errors
    /// and [`VersioningError::UnknownConstraint`] when the resolver does not
    /// know a constraint.
    pub fn parse(template: &str, resolver: &dyn InlineConstraintResolver) -> Result<Self> {
        let trimmed = template
            .strip_prefix("~/")
            .or_else(|| template.strip_prefix('/'))
            .unwrap_or(template);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut segments = Vec::new();
        for raw in trimmed.split('/') {
            if raw.is_empty() {
                return Err(VersioningError::invalid_template(
                    template,
                    "empty segment (double slash)",
                ));
            }
            segments.push(parse_segment(template, raw, resolver)?);
        }

        let parsed = Self { segments };
        parsed.validate(template)?;
        Ok(parsed)
    }

    fn validate(&self, template: &str) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        let last = self.segments.len().saturating_sub(1);

        for (index, segment) in self.segments.iter().enumerate() {
            for param in segment.parameters() {
                if seen.iter().any(|s| s.eq_ignore_ascii_case(&param.name)) {
                    return Err(VersioningError::invalid_template(
                        template,
                        format!("duplicate parameter '{{{}}}'", param.name),
                    ));
                }
                seen.push(&param.name);

                if (param.optional || param.catch_all)
                    && (index != last || segment.sole_parameter().is_none())
                {
                    return Err(VersioningError::invalid_template(
                        template,
                        format!(
                            "optional or catch-all parameter '{{{}}}' must be the whole \
                             last segment",
                            param.name
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Join a route prefix and an action template
    ///
    /// A template starting with `~/` overrides the prefix.
    pub fn combine(prefix: Option<&str>, template: &str) -> String {
        if let Some(rooted) = template.strip_prefix("~/") {
            return rooted.to_string();
        }

        let prefix = prefix.map(|p| p.trim_matches('/')).unwrap_or_default();
        let template = template.trim_matches('/');

        match (prefix.is_empty(), template.is_empty()) {
            (true, _) => template.to_string(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{prefix}/{template}"),
        }
    }

    /// Segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template is the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All parameters in template order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.segments.iter().flat_map(Segment::parameters)
    }

    /// Names of the parameters carrying the API version constraint
    pub fn version_parameters(&self) -> Vec<String> {
        self.parameters()
            .filter(|p| p.is_version())
            .map(|p| p.name.clone())
            .collect()
    }

    /// Copy of this template without every segment holding one of `names`
    ///
    /// `api/v{version}/agreements` without `version` is `api/agreements`.
    pub fn without_parameter_segments(&self, names: &[String]) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .filter(|segment| !names.iter().any(|name| segment.holds_parameter(name)))
                .cloned()
                .collect(),
        }
    }

    /// Template text without constraints, as used for API descriptions
    ///
    /// `api/v{version:apiVersion}/agreements/{accountId}` becomes
    /// `api/v{version}/agreements/{accountId}`.
    pub fn relative_path(&self) -> String {
        let mut path = String::new();
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                path.push('/');
            }
            // Writing into a String cannot fail
            let _ = segment.render(&mut path, false);
        }
        path
    }

    /// Match a request path against the template
    ///
    /// Query strings are ignored. Returns the captured parameter values, or
    /// `None` when a literal differs, a constraint rejects a value, or the
    /// segment counts do not line up.
    pub fn match_path(&self, path: &str) -> Option<RouteValues> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        let request: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let mut values = RouteValues::default();
        let last = self.segments.len().saturating_sub(1);

        for (index, segment) in self.segments.iter().enumerate() {
            if let Some(param) = segment.sole_parameter().filter(|p| p.catch_all) {
                let rest = request.get(index..).map(|r| r.join("/")).unwrap_or_default();
                if !rest.is_empty() {
                    if !param.accepts(&rest) {
                        return None;
                    }
                    values.push(&param.name, &rest);
                }
                return Some(values);
            }

            match request.get(index) {
                Some(raw) => segment.match_into(raw, &mut values)?,
                None => {
                    let optional = segment.sole_parameter().is_some_and(|p| p.optional);
                    return (optional && index == last).then_some(values);
                }
            }
        }

        (request.len() == self.segments.len()).then_some(values)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            segment.render(f, true)?;
        }
        Ok(())
    }
}

impl FromStr for RouteTemplate {
    type Err = VersioningError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, &DefaultConstraintResolver::new())
    }
}

fn parse_segment(
    template: &str,
    raw: &str,
    resolver: &dyn InlineConstraintResolver,
) -> Result<Segment> {
    let mut parts = Vec::new();
    let mut pos = 0;

    while pos < raw.len() {
        let rest = &raw[pos..];

        if let Some(inner_start) = rest.strip_prefix('{') {
            let end = inner_start.find('}').ok_or_else(|| {
                VersioningError::invalid_template(template, "unclosed brace '{' (missing '}')")
            })?;
            let inner = &inner_start[..end];
            if inner.contains('{') {
                return Err(VersioningError::invalid_template(
                    template,
                    "nested braces are not allowed",
                ));
            }
            if matches!(parts.last(), Some(SegmentPart::Parameter(_))) {
                return Err(VersioningError::invalid_template(
                    template,
                    "parameters must be separated by a literal",
                ));
            }
            parts.push(SegmentPart::Parameter(parse_parameter(template, inner, resolver)?));
            pos += end + 2;
        } else if rest.starts_with('}') {
            return Err(VersioningError::invalid_template(
                template,
                "unmatched closing brace '}'",
            ));
        } else {
            let next = rest.find(['{', '}']).unwrap_or(rest.len());
            parts.push(SegmentPart::Literal(rest[..next].to_string()));
            pos += next;
        }
    }

    Ok(Segment { parts })
}

fn parse_parameter(
    template: &str,
    inner: &str,
    resolver: &dyn InlineConstraintResolver,
) -> Result<Parameter> {
    let (inner, catch_all) = match inner.strip_prefix('*') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };
    let (inner, optional) = match inner.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let mut tokens = inner.split(':');
    let name = tokens.next().unwrap_or_default();

    if name.is_empty() {
        return Err(VersioningError::invalid_template(template, "empty parameter name '{}'"));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(VersioningError::invalid_template(
            template,
            format!("invalid parameter name '{{{name}}}'"),
        ));
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(VersioningError::invalid_template(
            template,
            format!("parameter name '{{{name}}}' cannot start with a digit"),
        ));
    }

    let mut constraints = Vec::new();
    for token in tokens {
        let (constraint, args) = match token.find('(') {
            Some(open) if token.ends_with(')') => {
                (&token[..open], Some(&token[open + 1..token.len() - 1]))
            }
            Some(_) => {
                return Err(VersioningError::invalid_template(
                    template,
                    format!("malformed constraint '{token}'"),
                ))
            }
            None => (token, None),
        };
        if constraint.is_empty() {
            return Err(VersioningError::invalid_template(
                template,
                format!("empty constraint on parameter '{{{name}}}'"),
            ));
        }
        let resolved = resolver.resolve(constraint, args).ok_or_else(|| {
            VersioningError::UnknownConstraint {
                template: template.to_string(),
                constraint: constraint.to_string(),
            }
        })?;
        constraints.push(resolved);
    }

    Ok(Parameter {
        name: name.to_string(),
        constraints,
        optional,
        catch_all,
    })
}

/// Replace every `{name}` token of a relative path with `value`
///
/// Works on constraint-free paths as produced by
/// [`RouteTemplate::relative_path`].
pub fn replace_parameter_tokens(path: &str, names: &[String], value: &str) -> String {
    names.iter().fold(path.to_string(), |path, name| {
        path.replace(&format!("{{{name}}}"), value)
    })
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}
