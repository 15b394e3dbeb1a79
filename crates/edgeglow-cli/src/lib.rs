#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scenario;
pub mod script;
pub mod simulate;

pub use cli::{Cli, run};
pub use error::{CliError, Result};
