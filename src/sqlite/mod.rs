//! `SQLite` backend: parameter conversion, result-set building, and the
//! execution entry points used by the dispatching executor.

pub mod executor;
pub mod params;
pub mod query;

pub use executor::{execute_batch, execute_dml, execute_insert, execute_select};
pub use query::build_result_set;
