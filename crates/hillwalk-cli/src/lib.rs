//! Hillwalk CLI library.
//!
//! Subcommand handlers, output rendering and terminal styling for the
//! `hillwalk` binary.

pub mod commands;
pub mod output;
pub mod terminal;
