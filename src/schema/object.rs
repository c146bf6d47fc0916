//! Object schemas and their combinators.

use crate::errors::{ParseError, SchemaBuildError, ValidationResult};
use crate::value::Value;

use super::types::{Schema, SchemaKind};

/// Policy for input keys not declared by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Reject the input with one issue per unknown key.
    Strict,
    /// Drop unknown keys from the output silently.
    #[default]
    Strip,
    /// Retain unknown keys in the output verbatim.
    Passthrough,
}

/// An object schema: an ordered mapping of unique field names to schemas
/// plus an unknown-key mode.
///
/// Field order is preserved for shape introspection; it does not affect
/// validation outcome.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<(String, Schema)>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    pub(crate) fn new(fields: Vec<(String, Schema)>) -> Self {
        let mut schema = Self {
            fields: Vec::with_capacity(fields.len()),
            unknown_keys: UnknownKeys::default(),
        };
        for (name, field) in fields {
            schema.insert(name, field);
        }
        schema
    }

    /// Last write wins; the field keeps its original position.
    fn insert(&mut self, name: String, schema: Schema) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((name, schema)),
        }
    }

    /// Returns the field-name-to-schema mapping in declaration order.
    pub fn shape(&self) -> &[(String, Schema)] {
        &self.fields
    }

    /// Returns a single field's schema.
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub(crate) fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Rejects inputs carrying keys absent from the field set.
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    /// Retains unknown input keys in the output verbatim.
    pub fn passthrough(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Passthrough;
        self
    }

    /// Restores the default mode: unknown keys are stripped silently.
    pub fn strip(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strip;
        self
    }

    /// Makes every field's presence optional without altering the fields'
    /// own type constraints. Fields that already accept absence are left
    /// unchanged.
    pub fn partial(self) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .map(|(name, field)| {
                    let field = if field.accepts_missing() {
                        field
                    } else {
                        field.optional()
                    };
                    (name, field)
                })
                .collect(),
            unknown_keys: self.unknown_keys,
        }
    }

    /// Keeps only the named fields.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaBuildError::UnknownField`] if a name is absent from
    /// this schema.
    pub fn pick<I, S>(&self, keys: I) -> Result<Self, SchemaBuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = self.known_keys(keys)?;
        Ok(Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| keys.iter().any(|k| k == name))
                .cloned()
                .collect(),
            unknown_keys: self.unknown_keys,
        })
    }

    /// Drops the named fields, keeping the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaBuildError::UnknownField`] if a name is absent from
    /// this schema.
    pub fn omit<I, S>(&self, keys: I) -> Result<Self, SchemaBuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = self.known_keys(keys)?;
        Ok(Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| !keys.iter().any(|k| k == name))
                .cloned()
                .collect(),
            unknown_keys: self.unknown_keys,
        })
    }

    fn known_keys<I, S>(&self, keys: I) -> Result<Vec<String>, SchemaBuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        for key in &keys {
            if self.field(key).is_none() {
                return Err(SchemaBuildError::UnknownField(key.clone()));
            }
        }
        Ok(keys)
    }

    /// Merges new field definitions in, overriding same-named fields.
    pub fn extend<I, K, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        for (name, schema) in fields {
            self.insert(name.into(), schema.into());
        }
        self
    }

    /// Unions both operands' field sets; on collision the right-hand
    /// operand's field definition wins, as does its unknown-key mode.
    pub fn merge(mut self, other: ObjectSchema) -> Self {
        for (name, schema) in other.fields {
            self.insert(name, schema);
        }
        self.unknown_keys = other.unknown_keys;
        self
    }

    /// See [`Schema::optional`].
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    /// See [`Schema::nullable`].
    pub fn nullable(self) -> Schema {
        Schema::from(self).nullable()
    }

    /// See [`Schema::refine`].
    pub fn refine<F>(self, predicate: F, message: impl Into<String>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::from(self).refine(predicate, message)
    }

    /// See [`Schema::parse`].
    pub fn parse(&self, input: &Value) -> Result<Value, ParseError> {
        Schema::from(self.clone()).parse(input)
    }

    /// See [`Schema::safe_parse`].
    pub fn safe_parse(&self, input: &Value) -> ValidationResult {
        Schema::from(self.clone()).safe_parse(input)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Schema {
        Schema::new(SchemaKind::Object(object))
    }
}
