//! Library selection for cross-map tests.

pub mod library;

pub use library::{LibraryDraw, LibrarySampler};
