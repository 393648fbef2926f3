//! PostgreSQL backend: parameter binding, result-set building, and the
//! execution entry points used by the dispatching executor.
//!
//! Statements arrive here already translated to `$N` placeholders.

pub mod executor;
pub mod params;
pub mod query;

pub use executor::{execute_batch, execute_dml, execute_insert, execute_select};
pub use query::build_result_set_from_rows;
