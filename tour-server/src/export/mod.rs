//! Adapters that move places in and out of the catalogue.
//!
//! CSV import/export, a Graphviz description of the index structure, and a
//! standalone HTML map. These only read the index traversal and route
//! results; nothing here feeds back into indexing or planning.

pub mod csv;
pub mod dot;
mod error;
pub mod map;

pub use error::{ExportError, ImportError};
