//! Configuration module for treefs
//!
//! Provides the operation set used for composition, config file loading,
//! and CLI arguments.

mod settings;

pub use settings::*;
