//! Schema construction and combinators.
//!
//! # Design Principles
//!
//! - Schemas are immutable once constructed; combinators return new values
//! - Construction-time misuse is a build error, never a validation failure
//! - Deterministic validation: no coercion, no per-call mutable state

mod builder;
mod object;
mod types;

pub use builder::{
    array, boolean, date, enumeration, literal, map, number, object, promise, record, set,
    string, tuple, union, ArraySchema, NumberSchema, StringSchema, TupleSchema,
};
pub use object::{ObjectSchema, UnknownKeys};
pub use types::{NumberCheck, Refinement, Schema, SchemaKind, SizeCheck, StringCheck};

pub(crate) use builder::string_matches;
