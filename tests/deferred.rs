//! Deferred (Promise Schema) Tests
//!
//! Tests for the async validation path:
//! - Sync entry points type-check the deferred and pass it through
//! - Async entry points await resolution and validate the inner value
//! - Entry points agree on outcome for the same schema and input

use verity::{number, object, promise, string, IssueCode, Schema, Value};

/// The sync path accepts a deferred value without resolving it.
#[test]
fn test_sync_parse_checks_outer_type_only() {
    let schema = promise(string());

    let deferred = Value::deferred(async { Value::Number(1.0) });
    // Inner mismatch is not visible synchronously.
    assert!(schema.safe_parse(&deferred).is_success());

    // A plain value is rejected outright.
    let result = schema.safe_parse(&Value::String("now".into()));
    assert_eq!(result.issues()[0].code, IssueCode::TypeMismatch);
}

/// The async path resolves the deferred and validates what it holds.
#[tokio::test]
async fn test_async_parse_validates_resolved_value() {
    let schema = promise(number().gte(0.0));

    let ok = Value::deferred(async { Value::Number(3.0) });
    assert_eq!(schema.parse_async(&ok).await.unwrap(), Value::Number(3.0));

    let bad = Value::deferred(async { Value::Number(-3.0) });
    let result = schema.safe_parse_async(&bad).await;
    assert!(!result.is_success());
    assert_eq!(result.issues()[0].code, IssueCode::TooSmall);
}

/// parse_async and safe_parse_async agree on outcome.
#[tokio::test]
async fn test_async_entry_points_agree() {
    let schema = promise(string());
    for make in [
        || Value::deferred(async { Value::String("ok".into()) }),
        || Value::deferred(async { Value::Bool(false) }),
    ] {
        let safe = schema.safe_parse_async(&make()).await.is_success();
        let raised = schema.parse_async(&make()).await.is_ok();
        assert_eq!(safe, raised);
    }
}

/// A deferred field inside an object passes through the sync walk; the host
/// resolves and validates it against the field's inner schema explicitly.
#[tokio::test]
async fn test_deferred_field_resolved_by_host() {
    let schema = object([
        ("name", Schema::from(string())),
        ("score", promise(number())),
    ]);

    let input = Value::object([
        ("name", Value::String("job".into())),
        ("score", Value::deferred(async { Value::Number(42.0) })),
    ]);

    let output = schema.parse(&input).unwrap();
    let score_field = schema.field("score").unwrap();
    match output {
        Value::Object(map) => {
            let score = score_field.parse_async(&map["score"]).await.unwrap();
            assert_eq!(score, Value::Number(42.0));
        }
        other => panic!("expected object, got {:?}", other),
    }
}

/// The same deferred value can be validated more than once.
#[tokio::test]
async fn test_deferred_reusable_across_calls() {
    let schema = promise(number());
    let input = Value::deferred(async { Value::Number(7.0) });
    assert!(schema.safe_parse_async(&input).await.is_success());
    assert!(schema.safe_parse_async(&input).await.is_success());
}
