//! Core layer - table state and the controller that drives it
//!
//! Everything here is independent of the terminal. The controller owns the
//! filter, search, pagination and data-source state and tells its caller
//! which requests to send.

pub mod cascade;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod query;
pub mod services;
pub mod sort;
pub mod source;
