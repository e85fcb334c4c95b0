//! Entry command
//!
//! Usage: menura entry <PATH> [--json]

use clap::Args;
use std::path::PathBuf;

use menura_entry::{DesktopEntry, Locale};

#[derive(Debug, Args)]
pub struct EntryArgs {
    /// Desktop-entry file to parse
    pub path: PathBuf,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute entry command
pub fn execute(args: EntryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let record = DesktopEntry::load(&args.path, &Locale::from_env())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Name:       {}", record.name);
    println!("Type:       {:?}", record.kind);
    if let Some(generic) = &record.generic_name {
        println!("Generic:    {generic}");
    }
    if let Some(comment) = &record.comment {
        println!("Comment:    {comment}");
    }
    if let Some(icon) = &record.icon {
        println!("Icon:       {icon}");
    }
    if let Some(exec) = &record.exec {
        println!("Exec:       {exec}");
    }
    if !record.categories.is_empty() {
        println!("Categories: {}", record.categories.join(";"));
    }
    if record.no_display {
        println!("NoDisplay:  true");
    }
    Ok(())
}
