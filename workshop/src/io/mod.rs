//! I/O helpers for workshop commands.

pub mod catalog_store;
pub mod config;
pub mod paths;
pub mod process;
pub mod progress_store;
pub mod solutions;
pub mod text;
