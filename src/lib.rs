//! verity - A strict, composable runtime schema validation engine
//!
//! Schemas are immutable descriptor values built from primitives (string,
//! number, boolean, date, literal, enum), composites (object, array, tuple,
//! union, record, map, set, promise), and modifiers (optional, nullable,
//! default, refinement). Validating an input produces either the typed
//! output value or a structured report of every fault found.
//!
//! # Design Principles
//!
//! - Schemas are immutable; combinators return new descriptors
//! - No implicit coercion; types must match exactly
//! - No fault is silently dropped: all issues across nested structures are
//!   collected before either propagation mode fires
//! - Two propagation modes per call site: `parse` (raise-style, for
//!   precondition violations) and `safe_parse` (branch on the outcome)
//! - Validation carries no per-call mutable state, so one schema can serve
//!   concurrent callers without synchronization
//!
//! # Example
//!
//! ```
//! use verity::{object, number, string, Schema, Value};
//! use serde_json::json;
//!
//! let user = object([
//!     ("username", Schema::from(string())),
//!     ("age", number().gt(0.0).optional()),
//! ]);
//!
//! let ok = user.safe_parse(&Value::from_json(json!({ "username": "faizan" })));
//! assert!(ok.is_success());
//!
//! let bad = user.safe_parse(&Value::from_json(json!({ "username": 7 })));
//! assert_eq!(bad.issues()[0].path.to_string(), "username");
//! ```

pub mod errors;
pub mod schema;
mod validate;
pub mod value;

pub use errors::{
    Issue, IssueCode, ParseError, Path, PathSegment, SchemaBuildError, ValidationResult,
};
pub use schema::{
    array, boolean, date, enumeration, literal, map, number, object, promise, record, set,
    string, tuple, union, ArraySchema, NumberSchema, ObjectSchema, Schema, SchemaKind,
    StringSchema, TupleSchema, UnknownKeys,
};
pub use value::{DeferredValue, Value};
