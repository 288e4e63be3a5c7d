//! Config subcommands handler

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use gmr::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(path: &Path) -> Result<()> {
    let config = Config::load_from(path)?;
    let state = if path.exists() { "" } else { " (not created, showing defaults)" };
    println!("# {}{}", path.display(), state);
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration to `path`.
///
/// An existing file is only replaced with `force` or after confirmation.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(path: &Path, force: bool) -> Result<()> {
    if path.exists()
        && !force
        && !prompt_confirmation(&format!("Overwrite {}?", path.display()))?
    {
        println!("No changes made.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Prompt user for yes/no confirmation.
///
/// Returns true if user confirms (y/yes), false otherwise.
/// If stdin is not a TTY (non-interactive), returns false.
fn prompt_confirmation(message: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        println!("Non-interactive mode: use --force to overwrite");
        return Ok(false);
    }

    print!("{} [y/N] ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
