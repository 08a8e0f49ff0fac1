//! Console rendering

pub mod table;

pub use table::{inserted_table, stale_table, summary_table};
