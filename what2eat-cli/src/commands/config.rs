use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use what2eat_server::AppConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print resolved settings with secrets redacted
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

pub fn run_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show(args) => run_show(args, config),
    }
}

fn run_show(args: ShowArgs, config: &AppConfig) -> Result<()> {
    let settings = config.settings().redacted();
    let url = config.connection().redacted_url();

    if args.json {
        let doc = serde_json::json!({
            "settings": settings,
            "database_url": url,
        });
        let rendered =
            serde_json::to_string_pretty(&doc).context("Failed to serialize settings")?;
        println!("{rendered}");
    } else {
        let rendered = toml::to_string(&settings).context("Failed to serialize settings")?;
        print!("{rendered}");
        println!("# database_url = \"{url}\"");
    }

    Ok(())
}
