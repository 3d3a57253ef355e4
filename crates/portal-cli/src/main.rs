//! Portal CLI
//!
//! Local driver for the works read API: prepare a SQLite store, load
//! fixtures, and run the same list queries the deployed handler serves.

use clap::{Parser, Subcommand};
use portal_core::logging_facility::{self, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "portal")]
#[command(about = "Portal - works read API", long_about = None)]
struct Cli {
    /// SQLite database holding the works table
    #[arg(long, global = true, default_value = ".portal/portal.db")]
    db: PathBuf,

    /// TOML file overriding table/index names and the default page size
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// development, production or test
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Import works from a YAML fixture file or directory
    Seed(commands::seed::SeedArgs),
    /// List works newest first, optionally filtered by tags
    List(commands::list::ListArgs),
    /// List works by one author
    ByUser(commands::list::ByUserArgs),
    /// Run a raw invocation payload through the router
    Invoke(commands::invoke::InvokeArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let global = commands::GlobalOpts {
        db: cli.db,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&global),
        Commands::Seed(args) => commands::seed::execute(&global, args),
        Commands::List(args) => commands::list::execute_list(&global, args),
        Commands::ByUser(args) => commands::list::execute_by_user(&global, args),
        Commands::Invoke(args) => commands::invoke::execute(&global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
