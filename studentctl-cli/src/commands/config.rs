use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use studentctl_core::DatabaseConfig;

use super::ConnectionArgs;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the default connection settings
    Init(InitArgs),
    /// Show the connection settings after every layer and flag (password masked)
    Show,
    /// Check the effective connection settings without connecting
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, conn: &ConnectionArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, conn),
        ConfigCommands::Show => run_show(conn),
        ConfigCommands::Validate => run_validate(conn),
        ConfigCommands::Path => run_path(conn),
    }
}

fn config_path(conn: &ConnectionArgs) -> std::path::PathBuf {
    conn.config.clone().unwrap_or_else(DatabaseConfig::config_path)
}

fn run_init(args: InitArgs, conn: &ConnectionArgs) -> Result<()> {
    let path = config_path(conn);

    if path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        );
    }

    DatabaseConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    println!("Created config at: {:?}", path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", path);
    println!("  2. Run: studentctl config validate");
    println!("  3. Run: studentctl init");

    Ok(())
}

fn run_show(conn: &ConnectionArgs) -> Result<()> {
    let config = conn.load_config()?;
    print!("{}", config.effective()?.to_toml()?);
    Ok(())
}

fn run_validate(conn: &ConnectionArgs) -> Result<()> {
    let config = conn.load_config()?;
    config.validate().context("Configuration invalid")?;
    let target = config.effective().context("Configuration invalid")?;

    println!("Configuration valid: {}/{}", target.host, target.dbname);
    Ok(())
}

fn run_path(conn: &ConnectionArgs) -> Result<()> {
    println!("{}", config_path(conn).display());
    Ok(())
}
