//! Config subcommand handlers.

use bootnet_config::ConfigError;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Rendering};

pub fn handle(
    args: ConfigArgs,
    cfg: &Config,
    global: &GlobalOpts,
    render: Rendering,
) -> Result<(), CliError> {
    let path = config::active_path(global);

    match args.command {
        ConfigCommand::Show => {
            let text = toml::to_string_pretty(cfg).map_err(ConfigError::from)?;
            let out = output::render_single(
                render.format,
                cfg,
                |_| text.trim_end().to_owned(),
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, render.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), render.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            if !render.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}
