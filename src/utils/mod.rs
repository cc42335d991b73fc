//! Utility functions module
//! 
//! This module contains time formatting, host matching and signal handling
//! helpers used throughout the application.

pub mod format;
pub mod host;
pub mod signals;

// Re-export main functions
pub use format::{format_time, time_per_participant};
pub use host::matches_host;
pub use signals::shutdown_signal;
