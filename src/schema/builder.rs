//! Schema constructors and typed builders.
//!
//! Free functions build the primitive and composite kinds; the typed
//! builders ([`StringSchema`], [`NumberSchema`], [`ArraySchema`],
//! [`TupleSchema`]) carry kind-specific checks and convert into [`Schema`]
//! wherever one is expected. Construction-time misuse surfaces as
//! [`SchemaBuildError`] rather than a validation failure.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::SchemaBuildError;
use crate::value::Value;

use super::object::ObjectSchema;
use super::types::{NumberCheck, Schema, SchemaKind, SizeCheck, StringCheck};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("url pattern compiles")
    })
}

/// String schema builder.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    checks: Vec<StringCheck>,
}

impl StringSchema {
    fn check(mut self, check: StringCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Minimum length in characters.
    pub fn min(self, len: usize) -> Self {
        self.check(StringCheck::Min(len))
    }

    /// Maximum length in characters.
    pub fn max(self, len: usize) -> Self {
        self.check(StringCheck::Max(len))
    }

    /// Exact length in characters.
    pub fn length(self, len: usize) -> Self {
        self.check(StringCheck::Length(len))
    }

    /// Must look like an email address.
    pub fn email(self) -> Self {
        self.check(StringCheck::Email)
    }

    /// Must look like a URL.
    pub fn url(self) -> Self {
        self.check(StringCheck::Url)
    }

    /// Must start with `prefix`.
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.check(StringCheck::StartsWith(prefix.into()))
    }

    /// Must end with `suffix`.
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.check(StringCheck::EndsWith(suffix.into()))
    }

    /// Must match `pattern`. The pattern is compiled here, so a malformed
    /// pattern is a build-time error.
    pub fn pattern(self, pattern: &str) -> Result<Self, SchemaBuildError> {
        let compiled = Regex::new(pattern).map_err(|source| SchemaBuildError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.check(StringCheck::Pattern(compiled)))
    }

    /// Converts into a [`Schema`].
    pub fn into_schema(self) -> Schema {
        self.into()
    }

    /// See [`Schema::optional`].
    pub fn optional(self) -> Schema {
        self.into_schema().optional()
    }

    /// See [`Schema::nullable`].
    pub fn nullable(self) -> Schema {
        self.into_schema().nullable()
    }

    /// See [`Schema::default_value`].
    pub fn default_value(self, value: impl Into<Value>) -> Schema {
        self.into_schema().default_value(value)
    }

    /// See [`Schema::refine`].
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.into_schema().refine(predicate, message)
    }
}

impl From<StringSchema> for Schema {
    fn from(builder: StringSchema) -> Schema {
        Schema::new(SchemaKind::String {
            checks: builder.checks,
        })
    }
}

/// Number schema builder.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    checks: Vec<NumberCheck>,
}

impl NumberSchema {
    fn check(mut self, check: NumberCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Strictly greater than `bound`.
    pub fn gt(self, bound: f64) -> Self {
        self.check(NumberCheck::Gt(bound))
    }

    /// Greater than or equal to `bound`.
    pub fn gte(self, bound: f64) -> Self {
        self.check(NumberCheck::Gte(bound))
    }

    /// Strictly less than `bound`.
    pub fn lt(self, bound: f64) -> Self {
        self.check(NumberCheck::Lt(bound))
    }

    /// Less than or equal to `bound`.
    pub fn lte(self, bound: f64) -> Self {
        self.check(NumberCheck::Lte(bound))
    }

    /// Whole number.
    pub fn int(self) -> Self {
        self.check(NumberCheck::Int)
    }

    /// Strictly greater than zero.
    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    /// Greater than or equal to zero.
    pub fn nonnegative(self) -> Self {
        self.gte(0.0)
    }

    /// Converts into a [`Schema`].
    pub fn into_schema(self) -> Schema {
        self.into()
    }

    /// See [`Schema::optional`].
    pub fn optional(self) -> Schema {
        self.into_schema().optional()
    }

    /// See [`Schema::nullable`].
    pub fn nullable(self) -> Schema {
        self.into_schema().nullable()
    }

    /// See [`Schema::default_value`].
    pub fn default_value(self, value: impl Into<Value>) -> Schema {
        self.into_schema().default_value(value)
    }

    /// See [`Schema::refine`].
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.into_schema().refine(predicate, message)
    }
}

impl From<NumberSchema> for Schema {
    fn from(builder: NumberSchema) -> Schema {
        Schema::new(SchemaKind::Number {
            checks: builder.checks,
        })
    }
}

/// Array schema builder.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Schema,
    checks: Vec<SizeCheck>,
}

impl ArraySchema {
    /// Minimum element count.
    pub fn min(mut self, len: usize) -> Self {
        self.checks.push(SizeCheck::Min(len));
        self
    }

    /// Maximum element count.
    pub fn max(mut self, len: usize) -> Self {
        self.checks.push(SizeCheck::Max(len));
        self
    }

    /// At least one element.
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    /// Converts into a [`Schema`].
    pub fn into_schema(self) -> Schema {
        self.into()
    }

    /// See [`Schema::optional`].
    pub fn optional(self) -> Schema {
        self.into_schema().optional()
    }

    /// See [`Schema::nullable`].
    pub fn nullable(self) -> Schema {
        self.into_schema().nullable()
    }
}

impl From<ArraySchema> for Schema {
    fn from(builder: ArraySchema) -> Schema {
        Schema::new(SchemaKind::Array {
            element: Box::new(builder.element),
            checks: builder.checks,
        })
    }
}

/// Tuple schema builder.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    items: Vec<Schema>,
    rest: Option<Schema>,
}

impl TupleSchema {
    /// Applies `schema` to elements beyond the fixed positions.
    pub fn rest(mut self, schema: impl Into<Schema>) -> Self {
        self.rest = Some(schema.into());
        self
    }

    /// Converts into a [`Schema`].
    pub fn into_schema(self) -> Schema {
        self.into()
    }

    /// See [`Schema::optional`].
    pub fn optional(self) -> Schema {
        self.into_schema().optional()
    }

    /// See [`Schema::nullable`].
    pub fn nullable(self) -> Schema {
        self.into_schema().nullable()
    }
}

impl From<TupleSchema> for Schema {
    fn from(builder: TupleSchema) -> Schema {
        Schema::new(SchemaKind::Tuple {
            items: builder.items,
            rest: builder.rest.map(Box::new),
        })
    }
}

/// A string schema.
pub fn string() -> StringSchema {
    StringSchema::default()
}

/// A number schema.
pub fn number() -> NumberSchema {
    NumberSchema::default()
}

/// A boolean schema.
pub fn boolean() -> Schema {
    Schema::new(SchemaKind::Boolean)
}

/// A date schema.
pub fn date() -> Schema {
    Schema::new(SchemaKind::Date)
}

/// A schema accepting exactly `value`.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::new(SchemaKind::Literal(value.into()))
}

/// A schema accepting one of the given string variants.
///
/// # Errors
///
/// Returns [`SchemaBuildError::EmptyEnum`] when no variants are given.
pub fn enumeration<I, S>(variants: I) -> Result<Schema, SchemaBuildError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let variants: Vec<String> = variants.into_iter().map(Into::into).collect();
    if variants.is_empty() {
        return Err(SchemaBuildError::EmptyEnum);
    }
    Ok(Schema::new(SchemaKind::Enum(variants)))
}

/// An object schema with the given named fields. A later duplicate field
/// name overrides an earlier one. Unknown input keys are stripped by
/// default; see [`ObjectSchema::strict`] and [`ObjectSchema::passthrough`].
pub fn object<I, K, S>(fields: I) -> ObjectSchema
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<Schema>,
{
    ObjectSchema::new(
        fields
            .into_iter()
            .map(|(name, schema)| (name.into(), schema.into()))
            .collect(),
    )
}

/// A homogeneous array schema.
pub fn array(element: impl Into<Schema>) -> ArraySchema {
    ArraySchema {
        element: element.into(),
        checks: Vec::new(),
    }
}

/// A tuple schema with fixed-position element schemas.
pub fn tuple<I>(items: I) -> TupleSchema
where
    I: IntoIterator<Item = Schema>,
{
    TupleSchema {
        items: items.into_iter().collect(),
        rest: None,
    }
}

/// A union schema trying `alternatives` in declared order.
///
/// # Errors
///
/// Returns [`SchemaBuildError::UnionTooSmall`] for fewer than two
/// alternatives.
pub fn union<I>(alternatives: I) -> Result<Schema, SchemaBuildError>
where
    I: IntoIterator<Item = Schema>,
{
    let alternatives: Vec<Schema> = alternatives.into_iter().collect();
    if alternatives.len() < 2 {
        return Err(SchemaBuildError::UnionTooSmall(alternatives.len()));
    }
    Ok(Schema::new(SchemaKind::Union(alternatives)))
}

/// A record schema: an object whose keys match `key` and whose values match
/// `value`.
pub fn record(key: impl Into<Schema>, value: impl Into<Schema>) -> Schema {
    Schema::new(SchemaKind::Record {
        key: Box::new(key.into()),
        value: Box::new(value.into()),
    })
}

/// A map schema whose keys may be any value matching `key`.
pub fn map(key: impl Into<Schema>, value: impl Into<Schema>) -> Schema {
    Schema::new(SchemaKind::Map {
        key: Box::new(key.into()),
        value: Box::new(value.into()),
    })
}

/// A set schema whose members match `element`.
pub fn set(element: impl Into<Schema>) -> Schema {
    Schema::new(SchemaKind::Set {
        element: Box::new(element.into()),
    })
}

/// A schema accepting a deferred value whose resolution matches `inner`.
///
/// The synchronous entry points verify only that the input is deferred; the
/// async entry points also await it and validate the resolved value.
pub fn promise(inner: impl Into<Schema>) -> Schema {
    Schema::new(SchemaKind::Promise(Box::new(inner.into())))
}

pub(crate) fn string_matches(check: &StringCheck, s: &str) -> bool {
    match check {
        StringCheck::Min(len) => s.chars().count() >= *len,
        StringCheck::Max(len) => s.chars().count() <= *len,
        StringCheck::Length(len) => s.chars().count() == *len,
        StringCheck::Email => email_pattern().is_match(s),
        StringCheck::Url => url_pattern().is_match(s),
        StringCheck::StartsWith(prefix) => s.starts_with(prefix.as_str()),
        StringCheck::EndsWith(suffix) => s.ends_with(suffix.as_str()),
        StringCheck::Pattern(pattern) => pattern.is_match(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_enum_is_build_error() {
        let result = enumeration(Vec::<String>::new());
        assert!(matches!(result, Err(SchemaBuildError::EmptyEnum)));
    }

    #[test]
    fn test_union_needs_two_alternatives() {
        let result = union([string().into_schema()]);
        assert!(matches!(result, Err(SchemaBuildError::UnionTooSmall(1))));
        assert!(union([string().into_schema(), number().into_schema()]).is_ok());
    }

    #[test]
    fn test_bad_pattern_is_build_error() {
        let result = string().pattern("[unclosed");
        assert!(matches!(
            result,
            Err(SchemaBuildError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_email_pattern() {
        assert!(string_matches(&StringCheck::Email, "a@b.co"));
        assert!(!string_matches(&StringCheck::Email, "not-an-email"));
        assert!(!string_matches(&StringCheck::Email, "a@b"));
    }

    #[test]
    fn test_url_pattern() {
        assert!(string_matches(&StringCheck::Url, "https://example.com/x"));
        assert!(!string_matches(&StringCheck::Url, "example.com"));
    }

    #[test]
    fn test_length_checks_count_characters() {
        assert!(string_matches(&StringCheck::Min(3), "héé"));
        assert!(string_matches(&StringCheck::Length(3), "héé"));
    }
}
