//! Cairn command line
//!
//! Wires the Consul client and the reconcilers behind a clap interface:
//! - `cli`: argument definitions
//! - `config`: layered configuration (defaults, file, environment, flags)
//! - `logging`: tracing subscriber setup
//! - `commands`: dispatch of parsed subcommands

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
