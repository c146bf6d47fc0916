//! Validation issues, error types, and the formatted diagnostic boundary.
//!
//! Two fault classes are kept distinct:
//! - [`SchemaBuildError`]: construction-time misuse (empty enum, undersized
//!   union, pick/omit naming an unknown field, invalid pattern), signaled
//!   when the schema is built.
//! - [`ParseError`]: validation-time faults, carrying the full ordered
//!   [`Issue`] list. No fault is silently dropped; all issues across nested
//!   structures are collected before the error is produced.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::value::Value;

/// One step locating a fault inside nested input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object/record key.
    Key(String),
    /// Array/tuple/set element or map entry index.
    Index(usize),
}

/// Ordered location of a fault within nested input.
///
/// Renders as `user.address.city` / `tags[1]`; the empty (root) path
/// renders as `$root`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the ordered segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$root");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", key)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Machine-checkable category of a validation fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Value (or its presence) does not match the expected type.
    TypeMismatch,
    /// Value violates a lower bound (length, count, or numeric minimum).
    TooSmall,
    /// Value violates an upper bound (length, count, or numeric maximum).
    TooBig,
    /// Value does not equal the expected literal.
    InvalidLiteral,
    /// Value is not a member of the expected enum.
    InvalidEnumValue,
    /// A refinement predicate rejected the value.
    Custom,
}

impl IssueCode {
    /// Returns the string code.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::TypeMismatch => "type_mismatch",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidLiteral => "invalid_literal",
            IssueCode::InvalidEnumValue => "invalid_enum_value",
            IssueCode::Custom => "custom",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single located validation fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Where in the input the fault was found.
    pub path: Path,
    /// Fault category.
    pub code: IssueCode,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Creates an issue.
    pub fn new(path: Path, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(path: Path, expected: &str, actual: &str) -> Self {
        Self::new(
            path,
            IssueCode::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    pub(crate) fn missing(path: Path, expected: &str) -> Self {
        Self::new(
            path,
            IssueCode::TypeMismatch,
            format!("required field is missing, expected {}", expected),
        )
    }

    pub(crate) fn unknown_key(path: Path) -> Self {
        Self::new(path, IssueCode::TypeMismatch, "unrecognized key")
    }

    pub(crate) fn too_small(path: Path, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::TooSmall, message)
    }

    pub(crate) fn too_big(path: Path, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::TooBig, message)
    }

    pub(crate) fn invalid_literal(path: Path, expected: &Value, actual: &Value) -> Self {
        Self::new(
            path,
            IssueCode::InvalidLiteral,
            format!(
                "invalid literal, expected {}, got {}",
                render(expected),
                render(actual)
            ),
        )
    }

    pub(crate) fn invalid_enum(path: Path, variants: &[String], actual: &Value) -> Self {
        Self::new(
            path,
            IssueCode::InvalidEnumValue,
            format!(
                "expected one of [{}], got {}",
                variants.join(", "),
                render(actual)
            ),
        )
    }

    pub(crate) fn custom(path: Path, message: impl Into<String>) -> Self {
        Self::new(path, IssueCode::Custom, message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Renders a value for diagnostics.
fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s),
        other => other.type_name().into(),
    }
}

/// Validation failure carrying the full ordered issue list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    issues: Vec<Issue>,
}

impl ParseError {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Returns the ordered issue list.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Joins every path-and-message pair into one summary string.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(Issue::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl std::error::Error for ParseError {}

/// Construction-time misuse of the schema-building API.
#[derive(Debug, Error)]
pub enum SchemaBuildError {
    /// An enum schema needs at least one variant.
    #[error("enum schema requires at least one variant")]
    EmptyEnum,

    /// A union schema needs at least two alternatives.
    #[error("union schema requires at least two alternatives, got {0}")]
    UnionTooSmall(usize),

    /// pick/omit named a field the source schema does not define.
    #[error("object schema has no field named '{0}'")]
    UnknownField(String),

    /// A user-supplied pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Outcome of the non-raising validation entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Validation succeeded; carries the output value (defaults
    /// materialized, unknown keys applied per mode).
    Success(Value),
    /// Validation failed; carries every collected issue.
    Failure(ParseError),
}

impl ValidationResult {
    /// Returns true on success.
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    /// Returns the output value on success.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ValidationResult::Success(value) => Some(value),
            ValidationResult::Failure(_) => None,
        }
    }

    /// Returns the error on failure.
    pub fn error(&self) -> Option<&ParseError> {
        match self {
            ValidationResult::Success(_) => None,
            ValidationResult::Failure(error) => Some(error),
        }
    }

    /// Returns the collected issues (empty on success).
    pub fn issues(&self) -> &[Issue] {
        self.error().map(ParseError::issues).unwrap_or(&[])
    }

    /// Bridges to `Result` for `?`-style call sites.
    pub fn into_result(self) -> Result<Value, ParseError> {
        match self {
            ValidationResult::Success(value) => Ok(value),
            ValidationResult::Failure(error) => Err(error),
        }
    }
}
