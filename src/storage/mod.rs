//! Storage layer for compinv
//!
//! Handles configuration management. Settings are kept in a TOML file.

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;
