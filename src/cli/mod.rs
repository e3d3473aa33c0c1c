//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{filter_spec, Cli, GenderChoice, PlacementChoice};
pub use prompts::*;
