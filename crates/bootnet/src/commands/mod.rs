//! Command dispatch: bridges CLI args -> core validation -> output formatting.

pub mod config_cmd;
pub mod inspect;
pub mod validate;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output::Rendering;

/// Dispatch a config-aware command to the appropriate handler.
pub fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let render = Rendering::resolve(global, cfg);
    match cmd {
        Command::Validate(args) => validate::handle(&args, cfg, render),
        Command::Inspect(args) => inspect::handle(&args, cfg, render),
        Command::Config(args) => config_cmd::handle(args, cfg, global, render),
        // Completions never reach dispatch; main handles them without config.
        Command::Completions(_) => Ok(()),
    }
}
