//! studentctl CLI - CRUD on the `students` table
//!
//! Subcommands map one-to-one onto store operations:
//! - `init` creates the table (idempotent)
//! - `seed` inserts the sample record
//! - `add`, `update`, `update-field`, `delete` take flags or prompt for input
//! - `find` looks a student up by number

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;
mod wizard;

use commands::config::ConfigArgs;
use commands::students::{AddArgs, DeleteArgs, FindArgs, UpdateArgs, UpdateFieldArgs};
use commands::ConnectionArgs;

#[derive(Parser, Debug)]
#[command(
    name = "studentctl",
    author,
    version,
    about = "Create, read, update and delete student records in PostgreSQL",
    long_about = "Manage a single `students` table. Every command opens one connection, \
                  runs its statements and closes the connection before exiting."
)]
struct Cli {
    /// Enable debug logging (connections, statements)
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the students table if it does not exist
    Init,
    /// Insert the built-in sample student
    Seed,
    /// Add a student (prompts for missing values)
    Add(AddArgs),
    /// Find a student by number
    Find(FindArgs),
    /// Replace name, address, age and number of a student
    Update(UpdateArgs),
    /// Update one field (name, address or age) of a student
    UpdateField(UpdateFieldArgs),
    /// Delete a student by number
    Delete(DeleteArgs),
    /// Manage studentctl configuration (init, show, validate, path)
    Config(ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let conn = &cli.connection;
    match cli.command {
        Commands::Init => commands::run_init(conn).await?,
        Commands::Seed => commands::run_seed(conn).await?,
        Commands::Add(args) => commands::run_add(args, conn).await?,
        Commands::Find(args) => commands::run_find(args, conn).await?,
        Commands::Update(args) => commands::run_update(args, conn).await?,
        Commands::UpdateField(args) => commands::run_update_field(args, conn).await?,
        Commands::Delete(args) => commands::run_delete(args, conn).await?,
        Commands::Config(args) => commands::run_config(args, conn)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
