//! Convenient imports for the common surface of the crate.

pub use crate::app::{App, Context, FnHandler, Handler, Request, Response, SharedHandler, handler};
pub use crate::config::DbConfig;
pub use crate::error::{ConstraintKind, DbError};
pub use crate::executor::SqlExecutor;
pub use crate::fields::FieldMap;
pub use crate::model::{EntityDef, Repository};
pub use crate::pool::{Database, DbConnection};
pub use crate::results::{DbRow, ResultSet};
pub use crate::router::{
    Dispatch, Method, PathParams, RouteError, RouteMatch, Router, UnknownMethod,
};
pub use crate::statement::{BuiltStatement, InsertOutcome};
pub use crate::transaction::Transaction;
pub use crate::translation::{PlaceholderStyle, placeholder_count, translate_placeholders};
pub use crate::types::{DatabaseType, SqlValue};
