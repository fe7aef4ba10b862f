//! Case-insensitive resolution of path segments against the filesystem.

pub mod cache;
pub mod core;
