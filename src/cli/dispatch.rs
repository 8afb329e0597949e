use super::classify::cmd_classify;
use super::config::cmd_config;
use super::env::CliArgs;
use super::patterns::cmd_patterns;
use super::pick::cmd_pick;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Pick(args) => cmd_pick(args, ctx).await,
        Commands::Classify(args) => cmd_classify(args, ctx).await,
        Commands::Patterns => cmd_patterns(ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
