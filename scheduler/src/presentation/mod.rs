pub mod schedule_table;

pub use schedule_table::{log_summary, schedule_table, stats_table, write_table};
