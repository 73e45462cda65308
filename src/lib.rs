pub mod batch;
pub mod codec;
pub mod error;
pub mod schema;

pub use crate::batch::{Column, ColumnValues};
pub use crate::error::{Error, Result};
pub use crate::schema::PgType;
