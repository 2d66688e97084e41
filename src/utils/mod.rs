//! Shared helpers.

pub mod json_path;

pub use json_path::PathMapper;
