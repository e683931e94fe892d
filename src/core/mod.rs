//! Core domain models for regpush
//!
//! This module defines the configuration, tag derivation, and run
//! reporting types the publisher operates on.

pub mod config;
pub mod registry;
pub mod report;

pub use config::*;
pub use registry::*;
pub use report::*;
