//! Configuration manager module
//!
//! This module contains the [`ConfigManager`] which loads every layer and
//! serves dot-path reads and writes, the [`ConfigManagerBuilder`] used to set
//! it up, [`SharedConfig`] for sharing one manager across threads, and the
//! [`EnvironmentHandler`] that maps dot-paths to environment variables.

mod builder;
mod core;
mod env;
mod operations;
mod shared;

pub use builder::ConfigManagerBuilder;
pub use self::core::ConfigManager;
pub use env::{EnvironmentHandler, NESTING_SEPARATOR};
pub use shared::SharedConfig;
