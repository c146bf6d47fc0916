//! Validation execution: the synchronous walk and the async promise path.
//!
//! The entry points live on [`crate::schema::Schema`]:
//! [`parse`](crate::schema::Schema::parse),
//! [`safe_parse`](crate::schema::Schema::safe_parse), and their async
//! counterparts for promise schemas.

mod deferred;
mod executor;
