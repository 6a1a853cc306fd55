//! Shared types and result types for the database layer

pub mod errors;

pub use errors::{DatabaseError, UnknownVariant};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
