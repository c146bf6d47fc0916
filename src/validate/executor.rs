//! The validation executor.
//!
//! Validation is a recursive walk of schema and input. Faults never
//! short-circuit across siblings: every element and field is visited so a
//! single call surfaces every issue at once, each tagged with the path of
//! the offending value. On success the walk produces the output value, with
//! defaults materialized and unknown object keys stripped, retained, or
//! rejected per the object's mode.

use std::collections::BTreeMap;

use crate::errors::{Issue, ParseError, Path, ValidationResult};
use crate::schema::{
    string_matches, NumberCheck, ObjectSchema, Schema, SchemaKind, SizeCheck, UnknownKeys,
};
use crate::value::Value;

impl Schema {
    /// Validates `input`, returning the typed output value on success.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying every collected issue. Intended for
    /// call sites that treat invalid input as a precondition violation; use
    /// [`Schema::safe_parse`] to branch on the outcome instead.
    pub fn parse(&self, input: &Value) -> Result<Value, ParseError> {
        self.safe_parse(input).into_result()
    }

    /// Validates `input`, returning the outcome directly.
    ///
    /// Never panics and never loses an issue: the two entry points agree on
    /// outcome for every schema and input.
    pub fn safe_parse(&self, input: &Value) -> ValidationResult {
        let mut issues = Vec::new();
        let mut path = Path::root();
        match check(self, input, &mut path, &mut issues) {
            Some(output) if issues.is_empty() => ValidationResult::Success(output),
            _ => ValidationResult::Failure(ParseError::new(issues)),
        }
    }
}

/// Validates one value against one schema at `path`. Returns the output
/// value, or `None` after pushing at least one issue.
fn check(schema: &Schema, value: &Value, path: &mut Path, issues: &mut Vec<Issue>) -> Option<Value> {
    match schema.kind() {
        // Presence is handled by the enclosing container; a present value
        // validates against the wrapped schema.
        SchemaKind::Optional(inner) => check(inner, value, path, issues),
        SchemaKind::Default { inner, .. } => check(inner, value, path, issues),
        SchemaKind::Nullable(inner) => {
            if value.is_null() {
                Some(Value::Null)
            } else {
                check(inner, value, path, issues)
            }
        }
        SchemaKind::Refined { inner, refinement } => {
            let output = check(inner, value, path, issues)?;
            if (refinement.predicate)(&output) {
                Some(output)
            } else {
                issues.push(Issue::custom(path.clone(), refinement.message.clone()));
                None
            }
        }
        SchemaKind::String { checks } => match value {
            Value::String(s) => {
                let before = issues.len();
                for c in checks {
                    if !string_matches(c, s) {
                        issues.push(string_check_issue(c, s, path));
                    }
                }
                done(issues.len() == before, || Value::String(s.clone()))
            }
            other => mismatch("string", other, path, issues),
        },
        SchemaKind::Number { checks } => match value {
            Value::Number(n) => {
                let before = issues.len();
                for c in checks {
                    if let Some(issue) = number_check_issue(c, *n, path) {
                        issues.push(issue);
                    }
                }
                done(issues.len() == before, || Value::Number(*n))
            }
            other => mismatch("number", other, path, issues),
        },
        SchemaKind::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            other => mismatch("bool", other, path, issues),
        },
        SchemaKind::Date => match value {
            Value::Date(d) => Some(Value::Date(*d)),
            other => mismatch("date", other, path, issues),
        },
        SchemaKind::Literal(expected) => {
            if value == expected {
                Some(value.clone())
            } else {
                issues.push(Issue::invalid_literal(path.clone(), expected, value));
                None
            }
        }
        SchemaKind::Enum(variants) => match value {
            Value::String(s) if variants.iter().any(|v| v == s) => {
                Some(Value::String(s.clone()))
            }
            other => {
                issues.push(Issue::invalid_enum(path.clone(), variants, other));
                None
            }
        },
        SchemaKind::Object(object) => check_object(object, value, path, issues),
        SchemaKind::Array { element, checks } => match value {
            Value::Array(items) => {
                let before = issues.len();
                for c in checks {
                    if let Some(issue) = size_check_issue(c, items.len(), path) {
                        issues.push(issue);
                    }
                }
                let output = check_elements(element, items, path, issues);
                done(issues.len() == before, || Value::Array(output))
            }
            other => mismatch("array", other, path, issues),
        },
        SchemaKind::Tuple { items, rest } => match value {
            Value::Array(elements) => check_tuple(items, rest.as_deref(), elements, path, issues),
            other => mismatch("tuple", other, path, issues),
        },
        SchemaKind::Union(alternatives) => check_union(alternatives, value, path, issues),
        SchemaKind::Record { key, value: val } => match value {
            Value::Object(map) => {
                let before = issues.len();
                let mut output = BTreeMap::new();
                for (k, v) in map {
                    path.push_key(k.clone());
                    check(key, &Value::String(k.clone()), path, issues);
                    if let Some(out) = check(val, v, path, issues) {
                        output.insert(k.clone(), out);
                    }
                    path.pop();
                }
                done(issues.len() == before, || Value::Object(output))
            }
            other => mismatch("record", other, path, issues),
        },
        SchemaKind::Map { key, value: val } => match value {
            Value::Map(entries) => {
                let before = issues.len();
                let mut output = Vec::with_capacity(entries.len());
                for (i, (k, v)) in entries.iter().enumerate() {
                    path.push_index(i);
                    path.push_key("key");
                    let key_out = check(key, k, path, issues);
                    path.pop();
                    path.push_key("value");
                    let value_out = check(val, v, path, issues);
                    path.pop();
                    path.pop();
                    if let (Some(k), Some(v)) = (key_out, value_out) {
                        output.push((k, v));
                    }
                }
                done(issues.len() == before, || Value::Map(output))
            }
            other => mismatch("map", other, path, issues),
        },
        SchemaKind::Set { element } => match value {
            Value::Set(members) => {
                let before = issues.len();
                let output = check_elements(element, members, path, issues);
                done(issues.len() == before, || Value::Set(output))
            }
            other => mismatch("set", other, path, issues),
        },
        // The synchronous path verifies the value is deferred and passes it
        // through; the async entry points resolve and validate the inner
        // value.
        SchemaKind::Promise(_) => match value {
            Value::Deferred(d) => Some(Value::Deferred(d.clone())),
            other => mismatch("deferred", other, path, issues),
        },
    }
}

fn check_object(
    object: &ObjectSchema,
    value: &Value,
    path: &mut Path,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let map = match value {
        Value::Object(map) => map,
        other => return mismatch("object", other, path, issues),
    };

    let before = issues.len();
    let mut output = BTreeMap::new();

    for (name, field) in object.shape() {
        match map.get(name) {
            Some(v) => {
                path.push_key(name.clone());
                if let Some(out) = check(field, v, path, issues) {
                    output.insert(name.clone(), out);
                }
                path.pop();
            }
            None => {
                if let Some(default) = field.default_for_missing() {
                    output.insert(name.clone(), default.clone());
                } else if !field.accepts_missing() {
                    path.push_key(name.clone());
                    issues.push(Issue::missing(path.clone(), field.kind_name()));
                    path.pop();
                }
            }
        }
    }

    for (key, v) in map {
        if object.field(key).is_some() {
            continue;
        }
        match object.unknown_keys() {
            UnknownKeys::Strict => {
                path.push_key(key.clone());
                issues.push(Issue::unknown_key(path.clone()));
                path.pop();
            }
            UnknownKeys::Passthrough => {
                output.insert(key.clone(), v.clone());
            }
            UnknownKeys::Strip => {}
        }
    }

    done(issues.len() == before, || Value::Object(output))
}

fn check_elements(
    element: &Schema,
    items: &[Value],
    path: &mut Path,
    issues: &mut Vec<Issue>,
) -> Vec<Value> {
    let mut output = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        path.push_index(i);
        if let Some(out) = check(element, item, path, issues) {
            output.push(out);
        }
        path.pop();
    }
    output
}

fn check_tuple(
    items: &[Schema],
    rest: Option<&Schema>,
    elements: &[Value],
    path: &mut Path,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let before = issues.len();

    if elements.len() < items.len() {
        issues.push(Issue::too_small(
            path.clone(),
            format!(
                "expected at least {} elements, got {}",
                items.len(),
                elements.len()
            ),
        ));
    } else if elements.len() > items.len() && rest.is_none() {
        issues.push(Issue::too_big(
            path.clone(),
            format!(
                "expected at most {} elements, got {}",
                items.len(),
                elements.len()
            ),
        ));
    }

    let mut output = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let schema = match items.get(i) {
            Some(schema) => schema,
            None => match rest {
                Some(rest) => rest,
                None => break,
            },
        };
        path.push_index(i);
        if let Some(out) = check(schema, element, path, issues) {
            output.push(out);
        }
        path.pop();
    }

    done(issues.len() == before, || Value::Array(output))
}

/// Alternatives are tried in declared order; the first success wins. When
/// all fail, one representative issue per alternative is reported.
fn check_union(
    alternatives: &[Schema],
    value: &Value,
    path: &mut Path,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let mut representatives = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        let mut sub = Vec::new();
        if let Some(output) = check(alternative, value, path, &mut sub) {
            if sub.is_empty() {
                return Some(output);
            }
        }
        if let Some(first) = sub.into_iter().next() {
            representatives.push(first);
        }
    }
    issues.extend(representatives);
    None
}

fn mismatch(
    expected: &str,
    actual: &Value,
    path: &mut Path,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    issues.push(Issue::type_mismatch(
        path.clone(),
        expected,
        actual.type_name(),
    ));
    None
}

fn done(ok: bool, output: impl FnOnce() -> Value) -> Option<Value> {
    if ok {
        Some(output())
    } else {
        None
    }
}

fn string_check_issue(
    check: &crate::schema::StringCheck,
    s: &str,
    path: &Path,
) -> Issue {
    use crate::schema::StringCheck;
    match check {
        StringCheck::Min(len) => Issue::too_small(
            path.clone(),
            format!("string must contain at least {} characters", len),
        ),
        StringCheck::Max(len) => Issue::too_big(
            path.clone(),
            format!("string must contain at most {} characters", len),
        ),
        StringCheck::Length(len) => {
            if s.chars().count() < *len {
                Issue::too_small(path.clone(), format!("string must contain exactly {} characters", len))
            } else {
                Issue::too_big(path.clone(), format!("string must contain exactly {} characters", len))
            }
        }
        StringCheck::Email => Issue::type_mismatch(path.clone(), "a valid email address", "string"),
        StringCheck::Url => Issue::type_mismatch(path.clone(), "a valid url", "string"),
        StringCheck::StartsWith(prefix) => Issue::new(
            path.clone(),
            crate::errors::IssueCode::TypeMismatch,
            format!("string must start with '{}'", prefix),
        ),
        StringCheck::EndsWith(suffix) => Issue::new(
            path.clone(),
            crate::errors::IssueCode::TypeMismatch,
            format!("string must end with '{}'", suffix),
        ),
        StringCheck::Pattern(pattern) => Issue::new(
            path.clone(),
            crate::errors::IssueCode::TypeMismatch,
            format!("string must match pattern '{}'", pattern.as_str()),
        ),
    }
}

fn number_check_issue(check: &NumberCheck, n: f64, path: &Path) -> Option<Issue> {
    match check {
        NumberCheck::Gt(bound) if !(n > *bound) => Some(Issue::too_small(
            path.clone(),
            format!("number must be greater than {}", bound),
        )),
        NumberCheck::Gte(bound) if !(n >= *bound) => Some(Issue::too_small(
            path.clone(),
            format!("number must be at least {}", bound),
        )),
        NumberCheck::Lt(bound) if !(n < *bound) => Some(Issue::too_big(
            path.clone(),
            format!("number must be less than {}", bound),
        )),
        NumberCheck::Lte(bound) if !(n <= *bound) => Some(Issue::too_big(
            path.clone(),
            format!("number must be at most {}", bound),
        )),
        NumberCheck::Int if !(n.is_finite() && n.fract() == 0.0) => Some(Issue::new(
            path.clone(),
            crate::errors::IssueCode::TypeMismatch,
            "expected an integer",
        )),
        _ => None,
    }
}

fn size_check_issue(check: &SizeCheck, len: usize, path: &Path) -> Option<Issue> {
    match check {
        SizeCheck::Min(bound) if len < *bound => Some(Issue::too_small(
            path.clone(),
            format!("array must contain at least {} elements", bound),
        )),
        SizeCheck::Max(bound) if len > *bound => Some(Issue::too_big(
            path.clone(),
            format!("array must contain at most {} elements", bound),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::IssueCode;
    use crate::schema::{boolean, literal, number, object, string, Schema};
    use crate::value::Value;
    use serde_json::json;

    fn input(json: serde_json::Value) -> Value {
        Value::from_json(json)
    }

    #[test]
    fn test_primitive_success_and_mismatch() {
        let schema: Schema = string().into();
        assert!(schema.safe_parse(&input(json!("hello"))).is_success());

        let result = schema.safe_parse(&input(json!(5)));
        let issues = result.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::TypeMismatch);
        assert_eq!(issues[0].path.to_string(), "$root");
    }

    #[test]
    fn test_nullable_accepts_null_only_for_nullable() {
        let plain: Schema = boolean();
        assert!(!plain.safe_parse(&Value::Null).is_success());
        let nullable = boolean().nullable();
        assert_eq!(nullable.parse(&Value::Null).unwrap(), Value::Null);
        assert!(nullable.safe_parse(&input(json!(true))).is_success());
    }

    #[test]
    fn test_literal() {
        let schema = literal("pizza");
        assert!(schema.safe_parse(&input(json!("pizza"))).is_success());
        let result = schema.safe_parse(&input(json!("pasta")));
        assert_eq!(result.issues()[0].code, IssueCode::InvalidLiteral);
    }

    #[test]
    fn test_all_sibling_issues_collected() {
        let schema = object([
            ("name", Schema::from(string())),
            ("age", Schema::from(number())),
        ]);
        let result = schema.safe_parse(&input(json!({ "name": 1, "age": "x" })));
        assert_eq!(result.issues().len(), 2);
    }

    #[test]
    fn test_refinement_reports_custom_code_at_refined_path() {
        let schema = string().refine(
            |v| matches!(v, Value::String(s) if s.len() % 2 == 0),
            "length must be even",
        );
        let result = schema.safe_parse(&input(json!("odd")));
        let issues = result.issues();
        assert_eq!(issues[0].code, IssueCode::Custom);
        assert_eq!(issues[0].path.to_string(), "$root");
        assert_eq!(issues[0].message, "length must be even");
    }
}
