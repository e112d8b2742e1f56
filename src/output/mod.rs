//! Output module for writing harvested quotes
//!
//! This module handles:
//! - Writing quotes to CSV with an explicit tag delimiter
//! - Reading a written file back for verification

mod csv_output;

pub use csv_output::{read_quotes, write_quotes};
