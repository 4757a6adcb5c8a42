//! Storage module
//!
//! A thin layer over `object_store` that resolves paths under a configured
//! root, expands input globs, and provides the primitives table writes are
//! built from (put, has-data probe, prefix delete).

mod glob;
mod store;

pub use glob::{is_hidden, GlobPattern};
pub use store::{Storage, StorageOptions};
