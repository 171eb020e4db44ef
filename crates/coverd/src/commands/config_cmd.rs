//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            print!("{}", coverd_config::to_toml(&cfg)?);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_file(global).display());
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_file(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = coverd_config::Config::default();
            cfg.device_url.clone_from(&global.device);
            if let Some(cover_id) = global.cover_id {
                cfg.cover_id = cover_id;
            }
            coverd_config::save_config(&cfg, &path)?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        }
    }
}
