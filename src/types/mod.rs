// Read Later shared type definitions
// Each submodule defines types used across the crate.

pub mod badge;
pub mod command;
pub mod errors;
pub mod reading_item;
pub mod settings;
