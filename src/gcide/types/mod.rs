//! Foundational data structures, error types, and the abbreviation table.

pub mod abbreviations;
pub mod error;
pub mod models;
