//! Schema Combinator Tests
//!
//! Tests for the derive-a-new-schema operations:
//! - partial / pick / omit / extend / merge
//! - Immutability: combinators never mutate the receiver
//! - Shape and element introspection

use serde_json::json;
use verity::{array, date, number, object, string, Schema, SchemaBuildError, Value};

fn input(json: serde_json::Value) -> Value {
    Value::from_json(json)
}

fn blog_schema() -> verity::ObjectSchema {
    object([
        ("title", Schema::from(string())),
        ("description", Schema::from(string())),
        ("views", number().int().into_schema()),
    ])
}

// =============================================================================
// partial
// =============================================================================

/// partial makes every field's presence optional.
#[test]
fn test_partial_accepts_any_missing_subset() {
    let schema = blog_schema().partial();
    assert!(schema.safe_parse(&input(json!({}))).is_success());
    assert!(schema
        .safe_parse(&input(json!({ "title": "hello" })))
        .is_success());
}

/// partial leaves each field's own type constraint unchanged.
#[test]
fn test_partial_keeps_field_constraints() {
    let schema = blog_schema().partial();
    let result = schema.safe_parse(&input(json!({ "views": 1.5 })));
    assert!(!result.is_success());
    assert_eq!(result.issues()[0].path.to_string(), "views");
}

/// partial returns a new schema; the source still requires its fields.
#[test]
fn test_partial_does_not_mutate_source() {
    let source = blog_schema();
    let _partial = source.clone().partial();
    assert!(!source.safe_parse(&input(json!({}))).is_success());
}

// =============================================================================
// pick / omit
// =============================================================================

/// pick keeps only the selected fields.
#[test]
fn test_pick_validates_only_selected_fields() {
    let schema = blog_schema().pick(["title"]).unwrap();
    assert!(schema
        .safe_parse(&input(json!({ "title": "hello" })))
        .is_success());
    // description is no longer required, and is stripped if supplied.
    let output = schema
        .parse(&input(json!({ "title": "hello", "description": "d" })))
        .unwrap();
    match output {
        Value::Object(map) => assert!(!map.contains_key("description")),
        other => panic!("expected object, got {:?}", other),
    }
}

/// omit keeps all but the selected fields.
#[test]
fn test_omit_drops_selected_fields() {
    let schema = blog_schema().omit(["views"]).unwrap();
    assert!(schema
        .safe_parse(&input(json!({ "title": "t", "description": "d" })))
        .is_success());
}

/// Naming a nonexistent field is a build-time error, not a validation one.
#[test]
fn test_pick_and_omit_reject_unknown_names() {
    assert!(matches!(
        blog_schema().pick(["missing"]),
        Err(SchemaBuildError::UnknownField(ref k)) if k == "missing"
    ));
    assert!(matches!(
        blog_schema().omit(["missing"]),
        Err(SchemaBuildError::UnknownField(ref k)) if k == "missing"
    ));
}

// =============================================================================
// extend / merge
// =============================================================================

/// extend adds fields and overrides same-named ones.
#[test]
fn test_extend_adds_and_overrides() {
    let schema = blog_schema().extend([
        ("published", date()),
        ("views", Schema::from(string())),
    ]);

    // views now validates as a string.
    assert_eq!(schema.field("views").map(Schema::kind_name), Some("string"));

    // published is a new required field: an input without it fails there
    // and only there.
    let result = schema.safe_parse(&input(json!({
        "title": "t",
        "description": "d",
        "views": "1204"
    })));
    assert!(!result.is_success());
    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].path.to_string(), "published");
}

/// merge unions both field sets; the right-hand definition wins collisions.
#[test]
fn test_merge_right_hand_wins() {
    let left = blog_schema();
    let right = object([
        ("views", Schema::from(string())),
        ("author", Schema::from(string())),
    ]);
    let merged = left.merge(right);
    assert!(merged
        .safe_parse(&input(json!({
            "title": "t",
            "description": "d",
            "views": "many",
            "author": "me"
        })))
        .is_success());
}

// =============================================================================
// Introspection
// =============================================================================

/// shape exposes the field-name-to-schema mapping in declaration order.
#[test]
fn test_shape_introspection() {
    let schema = blog_schema();
    let names: Vec<&str> = schema.shape().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["title", "description", "views"]);
    assert_eq!(schema.field("title").map(Schema::kind_name), Some("string"));
}

/// element exposes a container schema's inner element schema.
#[test]
fn test_element_introspection() {
    let schema: Schema = array(string().min(1)).into();
    assert_eq!(schema.element().map(Schema::kind_name), Some("string"));
}
