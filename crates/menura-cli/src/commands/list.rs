//! List command
//!
//! Usage: menura list

use clap::Args;

use menura_menu::MenuResolver;

#[derive(Debug, Args)]
pub struct ListArgs {}

/// Execute list command
pub fn execute(_args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = MenuResolver::new();
    for path in resolver.menu_files() {
        println!("{}", path.display());
    }
    Ok(())
}
