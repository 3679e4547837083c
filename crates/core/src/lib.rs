//! Decant shared core types
//!
//! Leaf crate with no workspace dependencies. Currently this is the home of
//! [`FileKind`], the classification that drives file lookup everywhere else.

pub mod file_kind;

pub use file_kind::FileKind;
