//! Infrastructure: durable and in-memory store implementations.
//!
//! Postgres for production, in-memory for tests/dev. The pool is always
//! constructed by the process entry point and passed in; nothing in this
//! crate reaches for ambient global state.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryLectureStore, InMemoryQuizStore, InMemoryTaskSetStore};
pub use postgres::{
    ensure_schema, PostgresJobLedger, PostgresLectureStore, PostgresQuizStore,
    PostgresTaskSetStore,
};
