//! Text-level parsing layer for GCIDE source files.
//!
//! # Module Organization
//!
//! - [`segment`]: Splits a file into balanced `<p>` blocks
//! - [`normalize`]: Rewrites legacy pseudo-markup into parseable text
//! - [`tree`]: Parses one normalized block into an element tree
//!
//! # Architecture
//!
//! ```text
//! file text ──▶ segment::segments() ──▶ Block
//!                                         │
//!                    normalize::normalize() ◀┘
//!                                         │
//!                          tree::Tree::parse() ──▶ extract
//! ```

pub mod normalize;
pub mod segment;
pub mod tree;
