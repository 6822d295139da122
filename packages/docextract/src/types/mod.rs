//! Domain data types.

pub mod classification;
pub mod config;
pub mod schema;
