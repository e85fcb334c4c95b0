//! Export command
//!
//! Usage: menura export [FILE] [--output <FILE>]

use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use menura_menu::MenuResolver;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Menu file to resolve (default: the discovered applications menu)
    pub file: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute export command
pub fn execute(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = MenuResolver::new();
    let menu = match &args.file {
        Some(path) => resolver.resolve(path)?,
        None => resolver.resolve_default()?,
    };

    match args.output {
        Some(output_path) => {
            debug!(path = %output_path.display(), "writing resolved menu");
            menu.save(&output_path)?;
            println!("Exported to {}", output_path.display());
        }
        None => print!("{}", menu.to_xml()),
    }
    Ok(())
}
