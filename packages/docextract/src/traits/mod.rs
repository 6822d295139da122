//! Core trait abstractions.
//!
//! - [`ai::DocumentAI`] - the external classification / extraction /
//!   schema-generation capability boundary
//! - [`store::SchemaStore`] - mechanical persistence for schema records

pub mod ai;
pub mod store;
