//! Command implementations for studentctl CLI

pub mod config;
pub mod students;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use studentctl_core::{ConnectionOverrides, DatabaseConfig, StudentStore};

// Re-export dispatcher functions for flat access from main.rs
pub use config::run_config;
pub use students::{
    run_add, run_delete, run_find, run_init, run_seed, run_update, run_update_field,
};

/// Connection flags shared by every database command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Config file (default: $STUDENTCTL_CONFIG or ~/.studentctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long, env = "STUDENTCTL_DB_HOST", global = true)]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = "STUDENTCTL_DB_PORT", global = true)]
    pub port: Option<u16>,

    /// Database name
    #[arg(long, env = "STUDENTCTL_DB_NAME", global = true)]
    pub dbname: Option<String>,

    /// Database user
    #[arg(long, env = "STUDENTCTL_DB_USER", global = true)]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "STUDENTCTL_DB_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,
}

impl ConnectionArgs {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            port: self.port,
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }

    /// Layered config: file, then `DATABASE_URL`, then these flags.
    pub fn load_config(&self) -> Result<DatabaseConfig> {
        let config = DatabaseConfig::load(self.config.as_deref())
            .context("Failed to load database configuration")?;
        Ok(config.with_overrides(self.overrides()))
    }

    /// Validated store, built only once the command's input is complete.
    pub fn store(&self) -> Result<StudentStore> {
        let config = self.load_config()?;
        let store = StudentStore::new(&config).context("Invalid database configuration")?;
        if let Ok(target) = config.effective() {
            tracing::debug!(host = %target.host, database = %target.dbname, "using database");
        }
        Ok(store)
    }
}
