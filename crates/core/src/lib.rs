//! tabgrid - table structure reconstruction from page ruling lines.

pub mod error;
pub mod layout;

// Re-export table module at the crate root
pub use layout::table;

pub use error::{Result, TableError};
