//! Page layout reconstruction.
//!
//! Only table structure lives here for now; text flow analysis is left
//! to the geometry provider.

pub mod table;

pub use table::*;
