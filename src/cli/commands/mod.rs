//! Command implementations for the Beacon CLI
//!
//! Each command is organized into its own module for better
//! maintainability.

pub mod package;
pub mod send;
pub mod version;
