//! CLI layer: argument definitions, command handlers and the interactive session

pub mod browse;
pub mod command_handlers;
pub mod dispatcher;
pub mod main_types;
