pub mod aggregate;
pub mod write;

pub use aggregate::{count_by_day, count_by_week, summarize, CountRow, DateBucket, Summary};
pub use write::write_report;
