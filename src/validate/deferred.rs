//! Async entry points for promise schemas.
//!
//! A promise schema introduces a single suspension point: the executor
//! awaits resolution of the deferred value before validating what it holds.
//! No timeout is imposed; callers wanting one race the deferred value
//! against a timer externally.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::errors::{Issue, ParseError, Path, ValidationResult};
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;

impl Schema {
    /// Like [`Schema::safe_parse`], but a promise schema at the root awaits
    /// the deferred value (recursively, for a promise of a promise) and
    /// validates what it resolves to, yielding the materialized inner value.
    ///
    /// Deferred values nested inside containers are type-checked and passed
    /// through, exactly as on the synchronous path; the host validates those
    /// by parsing the field's deferred value explicitly.
    pub fn safe_parse_async<'a>(
        &'a self,
        input: &'a Value,
    ) -> BoxFuture<'a, ValidationResult> {
        async move {
            match self.kind() {
                SchemaKind::Promise(inner) => match input {
                    Value::Deferred(deferred) => {
                        let resolved = deferred.resolve().await;
                        inner.safe_parse_async(&resolved).await
                    }
                    other => ValidationResult::Failure(ParseError::new(vec![
                        Issue::type_mismatch(Path::root(), "deferred", other.type_name()),
                    ])),
                },
                _ => self.safe_parse(input),
            }
        }
        .boxed()
    }

    /// Like [`Schema::parse`], but resolves promise schemas as
    /// [`Schema::safe_parse_async`] does.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying every collected issue.
    pub async fn parse_async(&self, input: &Value) -> Result<Value, ParseError> {
        self.safe_parse_async(input).await.into_result()
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::IssueCode;
    use crate::schema::{number, promise, string};
    use crate::value::Value;

    #[tokio::test]
    async fn test_promise_resolves_and_validates_inner() {
        let schema = promise(string().min(3));
        let input = Value::deferred(async { Value::String("hello".into()) });
        let output = schema.parse_async(&input).await.unwrap();
        assert_eq!(output, Value::String("hello".into()));
    }

    #[tokio::test]
    async fn test_promise_inner_failure_surfaces_issues() {
        let schema = promise(number().gt(0.0));
        let input = Value::deferred(async { Value::Number(-1.0) });
        let result = schema.safe_parse_async(&input).await;
        assert_eq!(result.issues()[0].code, IssueCode::TooSmall);
    }

    #[tokio::test]
    async fn test_promise_of_promise_resolves_recursively() {
        let schema = promise(promise(string()));
        let input = Value::deferred(async {
            Value::deferred(async { Value::String("nested".into()) })
        });
        let output = schema.parse_async(&input).await.unwrap();
        assert_eq!(output, Value::String("nested".into()));
    }

    #[tokio::test]
    async fn test_non_deferred_input_is_type_mismatch() {
        let schema = promise(string());
        let result = schema.safe_parse_async(&Value::Bool(true)).await;
        let issues = result.issues();
        assert_eq!(issues[0].code, IssueCode::TypeMismatch);
        assert!(issues[0].message.contains("deferred"));
    }

    #[tokio::test]
    async fn test_sync_parse_passes_deferred_through() {
        let schema = promise(string());
        let input = Value::deferred(async { Value::String("later".into()) });
        let output = schema.parse(&input).unwrap();
        assert!(matches!(output, Value::Deferred(_)));
    }

    #[tokio::test]
    async fn test_non_promise_schema_parses_synchronously() {
        let schema: crate::schema::Schema = string().into();
        let result = schema.safe_parse_async(&Value::String("x".into())).await;
        assert!(result.is_success());
    }
}
