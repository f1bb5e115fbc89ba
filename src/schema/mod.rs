pub mod resolve;

pub use resolve::{resolve_columns, ResolvedColumns, DATE_ALIASES};
