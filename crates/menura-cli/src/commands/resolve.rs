//! Resolve command
//!
//! Usage: menura resolve [FILE] [--json] [--environment NAME] [--strict]

use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use menura_menu::{Menu, MenuEntry, MenuResolver};

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Menu file to resolve (default: the discovered applications menu)
    pub file: Option<PathBuf>,

    /// Print the tree as JSON instead of indented text
    #[arg(long)]
    pub json: bool,

    /// Desktop environment name for OnlyShowIn/NotShowIn checks
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Sort applications by desktop-file name instead of display name
    #[arg(long)]
    pub strict: bool,
}

/// Execute resolve command
pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut resolver = MenuResolver::new();
    resolver.set_environment(args.environment.clone());
    resolver.set_strict(args.strict);
    debug!(
        environment = ?args.environment,
        strict = args.strict,
        "resolving menu definition"
    );

    let menu = match &args.file {
        Some(path) => resolver.resolve(path)?,
        None => resolver.resolve_default()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
    } else {
        print_menu(&menu, 0);
    }
    Ok(())
}

fn print_menu(menu: &Menu, depth: usize) {
    let pad = "  ".repeat(depth);
    println!("{pad}{}/", menu.name);
    for entry in &menu.entries {
        match entry {
            MenuEntry::Menu(sub) => print_menu(sub, depth + 1),
            MenuEntry::Desktop { id, name, .. } => {
                println!("{pad}  {name} ({id})");
            }
            MenuEntry::Separator => println!("{pad}  --------"),
            MenuEntry::Header { name, .. } => println!("{pad}  [{name}]"),
        }
    }
}
