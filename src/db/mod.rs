pub mod pool;
pub mod queries;
pub mod rows;
pub mod source;

pub use pool::create_pool;
pub use queries::PgRecordSource;
pub use source::{DateRange, RecordQuery, RecordSource};
