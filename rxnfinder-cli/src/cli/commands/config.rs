use super::load_or_default;
use crate::cli::output;
use clap::{Args, Subcommand};
use rxnfinder_core::{default_config_path, save_config, Config, RxnFinderError};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Target path (defaults to $RXNFINDER_HOME/config.toml)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show {
        /// Configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                return Err(RxnFinderError::Configuration(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RxnFinderError::Io(std::io::Error::new(
                        e.kind(),
                        format!("cannot create {}: {}", parent.display(), e),
                    ))
                })?;
            }
            save_config(&path, &Config::default())?;
            output::success(&format!("Wrote {}", path.display()));
            Ok(())
        }
        ConfigCommands::Show { config } => {
            let config = load_or_default(config.as_deref())?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| RxnFinderError::Configuration(e.to_string()))?;
            print!("{}", text);
            Ok(())
        }
    }
}
