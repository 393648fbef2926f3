//! Request routing and pooled data access for a multi-tenant school
//! management web application.
//!
//! This crate is the infrastructure core the domain code (controllers and
//! entity models for schools, users, classes, assignments, grading,
//! messaging) is built on. It provides two contracts:
//!
//! - a [`router::Router`] mapping HTTP verb + path templates like
//!   `/classes/{id}/students` to handlers, with an [`app::App`] shell that
//!   runs one handler per request, and
//! - a data-access layer: a pooled [`pool::Database`] handle, the
//!   [`executor::SqlExecutor`] execution primitive, dynamic statement
//!   synthesis in [`statement`], transaction scopes in [`transaction`], and
//!   the generic per-entity CRUD accessor in [`model`].
//!
//! All statement text uses `?` placeholders and values are always bound
//! positionally; nothing user-supplied is ever spliced into SQL.

pub mod app;
pub mod config;
pub mod error;
pub mod executor;
pub mod fields;
pub mod model;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod router;
pub mod statement;
pub mod transaction;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{ConstraintKind, DbError};
pub use types::{DatabaseType, SqlValue};
