//! Menura CLI
//!
//! Command-line interface for the menu resolver

use clap::{Parser, Subcommand};

use menura_menu::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "menura")]
#[command(about = "Menura - freedesktop menu resolver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a menu file and print the resulting tree
    Resolve(commands::resolve::ResolveArgs),
    /// Resolve a menu file and write it back as menu XML
    Export(commands::export::ExportArgs),
    /// List the menu files visible in the config search path
    List(commands::list::ListArgs),
    /// Parse a single desktop-entry file
    Entry(commands::entry::EntryArgs),
}

fn main() {
    // info level by default; RUST_LOG=menura=debug for pipeline tracing
    logging_facility::init(Profile::Production);
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Export(args) => commands::export::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Entry(args) => commands::entry::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
