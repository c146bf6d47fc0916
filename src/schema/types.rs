//! Schema descriptor types.
//!
//! A [`Schema`] is an immutable descriptor built once and reused across many
//! validation calls. Combinators never mutate the receiver; each returns a
//! new descriptor, so schemas can be shared across threads without
//! synchronization.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::value::Value;

use super::object::ObjectSchema;

/// Immutable descriptor of a validation rule and its expected shape.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: SchemaKind,
}

/// The declared kind of a schema.
#[derive(Debug, Clone)]
pub enum SchemaKind {
    /// UTF-8 string with optional checks (length bounds, formats).
    String { checks: Vec<StringCheck> },
    /// Number with optional checks (bounds, integer).
    Number { checks: Vec<NumberCheck> },
    /// Boolean.
    Boolean,
    /// Point in time.
    Date,
    /// Exactly one permitted value.
    Literal(Value),
    /// One of a fixed set of string variants.
    Enum(Vec<String>),
    /// Object with named fields and an unknown-key mode.
    Object(ObjectSchema),
    /// Homogeneous sequence.
    Array {
        element: Box<Schema>,
        checks: Vec<SizeCheck>,
    },
    /// Fixed-position elements, with an optional rest schema applied to
    /// elements beyond the fixed positions.
    Tuple {
        items: Vec<Schema>,
        rest: Option<Box<Schema>>,
    },
    /// Alternatives tried in declared order; always two or more.
    Union(Vec<Schema>),
    /// String-keyed entries validated against key and value schemas.
    Record {
        key: Box<Schema>,
        value: Box<Schema>,
    },
    /// Entries whose keys may be any value.
    Map {
        key: Box<Schema>,
        value: Box<Schema>,
    },
    /// Unordered members validated against one element schema.
    Set { element: Box<Schema> },
    /// A deferred value whose resolution matches the inner schema.
    Promise(Box<Schema>),
    /// Absence is accepted (meaningful inside objects).
    Optional(Box<Schema>),
    /// Explicit null is accepted.
    Nullable(Box<Schema>),
    /// Absence is replaced with a default. Null is not defaulted.
    Default { inner: Box<Schema>, value: Value },
    /// A predicate applied after the inner schema succeeds.
    Refined {
        inner: Box<Schema>,
        refinement: Refinement,
    },
}

/// Checks applied to string values.
#[derive(Debug, Clone)]
pub enum StringCheck {
    /// Minimum length in characters.
    Min(usize),
    /// Maximum length in characters.
    Max(usize),
    /// Exact length in characters.
    Length(usize),
    /// Must look like an email address.
    Email,
    /// Must look like a URL.
    Url,
    /// Must start with the given prefix.
    StartsWith(String),
    /// Must end with the given suffix.
    EndsWith(String),
    /// Must match the compiled pattern.
    Pattern(Regex),
}

/// Checks applied to number values.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberCheck {
    /// Strictly greater than.
    Gt(f64),
    /// Greater than or equal to.
    Gte(f64),
    /// Strictly less than.
    Lt(f64),
    /// Less than or equal to.
    Lte(f64),
    /// Whole number.
    Int,
}

/// Element-count checks applied to arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// Minimum element count.
    Min(usize),
    /// Maximum element count.
    Max(usize),
}

/// A user-supplied predicate layered atop a base schema.
#[derive(Clone)]
pub struct Refinement {
    pub(crate) predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    pub(crate) message: String,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("message", &self.message)
            .finish()
    }
}

impl Schema {
    pub(crate) fn new(kind: SchemaKind) -> Self {
        Self { kind }
    }

    /// Returns the declared kind for introspection.
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Returns the kind name for diagnostics. Wrapper kinds report the name
    /// of the schema they wrap.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::String { .. } => "string",
            SchemaKind::Number { .. } => "number",
            SchemaKind::Boolean => "bool",
            SchemaKind::Date => "date",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Object(_) => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Tuple { .. } => "tuple",
            SchemaKind::Union(_) => "union",
            SchemaKind::Record { .. } => "record",
            SchemaKind::Map { .. } => "map",
            SchemaKind::Set { .. } => "set",
            SchemaKind::Promise(_) => "deferred",
            SchemaKind::Optional(inner)
            | SchemaKind::Nullable(inner)
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Refined { inner, .. } => inner.kind_name(),
        }
    }

    /// Accepts absence of the value (for object fields).
    pub fn optional(self) -> Schema {
        Schema::new(SchemaKind::Optional(Box::new(self)))
    }

    /// Accepts explicit null.
    pub fn nullable(self) -> Schema {
        Schema::new(SchemaKind::Nullable(Box::new(self)))
    }

    /// Substitutes `value` when the input is absent. An explicit null is
    /// never defaulted.
    pub fn default_value(self, value: impl Into<Value>) -> Schema {
        Schema::new(SchemaKind::Default {
            inner: Box::new(self),
            value: value.into(),
        })
    }

    /// Applies `predicate` to the parsed value after base validation
    /// succeeds; a false return fails validation with `message`.
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::new(SchemaKind::Refined {
            inner: Box::new(self),
            refinement: Refinement {
                predicate: Arc::new(predicate),
                message: message.into(),
            },
        })
    }

    /// Returns a container schema's element schema (arrays and sets),
    /// looking through wrapper kinds.
    pub fn element(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Array { element, .. } | SchemaKind::Set { element } => Some(element),
            SchemaKind::Optional(inner)
            | SchemaKind::Nullable(inner)
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Refined { inner, .. } => inner.element(),
            _ => None,
        }
    }

    /// Returns an object schema's field-name-to-schema mapping, looking
    /// through wrapper kinds.
    pub fn shape(&self) -> Option<&[(String, Schema)]> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object.shape()),
            SchemaKind::Optional(inner)
            | SchemaKind::Nullable(inner)
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Refined { inner, .. } => inner.shape(),
            _ => None,
        }
    }

    /// True if an absent value is valid for this schema.
    pub(crate) fn accepts_missing(&self) -> bool {
        match &self.kind {
            SchemaKind::Optional(_) | SchemaKind::Default { .. } => true,
            SchemaKind::Nullable(inner) | SchemaKind::Refined { inner, .. } => {
                inner.accepts_missing()
            }
            _ => false,
        }
    }

    /// The value to substitute when the input is absent, if any.
    pub(crate) fn default_for_missing(&self) -> Option<&Value> {
        match &self.kind {
            SchemaKind::Default { value, .. } => Some(value),
            SchemaKind::Optional(_) => None,
            SchemaKind::Nullable(inner) | SchemaKind::Refined { inner, .. } => {
                inner.default_for_missing()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{array, number, object, set, string};

    #[test]
    fn test_kind_name_looks_through_wrappers() {
        let schema = string().into_schema().optional().nullable();
        assert_eq!(schema.kind_name(), "string");
    }

    #[test]
    fn test_accepts_missing() {
        assert!(!Schema::from(string()).accepts_missing());
        assert!(Schema::from(string()).optional().accepts_missing());
        assert!(Schema::from(number()).default_value(0.0).accepts_missing());
        assert!(Schema::from(string())
            .optional()
            .refine(|_| true, "x")
            .accepts_missing());
    }

    #[test]
    fn test_default_for_missing_ignores_optional() {
        let defaulted = Schema::from(number()).default_value(42.0);
        assert_eq!(defaulted.default_for_missing(), Some(&Value::Number(42.0)));
        assert_eq!(Schema::from(number()).optional().default_for_missing(), None);
    }

    #[test]
    fn test_element_accessor() {
        let arr: Schema = array(string()).into();
        assert_eq!(arr.element().map(Schema::kind_name), Some("string"));
        let members: Schema = set(number());
        assert_eq!(members.element().map(Schema::kind_name), Some("number"));
        assert!(Schema::from(string()).element().is_none());
    }

    #[test]
    fn test_shape_accessor() {
        let schema: Schema = object([("name", Schema::from(string()))]).into();
        let shape = schema.shape().unwrap();
        assert_eq!(shape.len(), 1);
        assert_eq!(shape[0].0, "name");
        assert_eq!(shape[0].1.kind_name(), "string");
    }
}
