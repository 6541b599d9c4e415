//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Conversions from library errors into the crate's error types
pub mod error_helpers;

/// Logger initialisation
pub mod logging;

/// Unicode-aware text width helpers
pub mod text;

/// Input validation utilities
pub mod validation;
