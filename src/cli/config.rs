use crate::cli::context::CliContext;
use crate::cli::runtime::{read_config_file, save_config_file};
use crate::config::PickerConfig;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use tokio::fs;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file, defaults and env overrides)
    Show,

    /// Validate the configuration file, including every pattern rule
    Validate,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path().to_path_buf();
    match args.action {
        ConfigAction::Show => {
            if matches!(ctx.output(), crate::cli::output::OutputFormat::Human) {
                let source = if ctx.config_from_file() {
                    path.display().to_string()
                } else {
                    format!("defaults, {} not found", path.display())
                };
                println!("Current configuration ({}):", source);
            }
            let yaml = ctx.config().to_yaml()?;
            ctx.output().print(ctx.config(), |_| yaml)?;
        }
        ConfigAction::Validate => {
            if fs::try_exists(&path).await? {
                // the file is re-read so env overrides do not mask its contents
                let config = read_config_file(&path).await?;
                config.build_engine()?;
                println!("Configuration file {} is valid", path.display());
            } else {
                ctx.engine()?;
                println!(
                    "No configuration file at {}; defaults are valid",
                    path.display()
                );
            }
        }
        ConfigAction::Init { force } => {
            if fs::try_exists(&path).await? && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            save_config_file(&path, &PickerConfig::default()).await?;
            info!("Wrote default configuration to {}", path.display());
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
