//! # leadpage-cli
//!
//! The `leadpage` command:
//! - `serve`: run the HTTP server
//! - `lookup SLUG`: print a lead and its page metadata
//! - `call-demo SLUG`: drive a lead's call widget through a scripted call
//! - `config path|get|set|init|export`: manage the TOML config file

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use commands::run;
pub use error::{Error, Result};
