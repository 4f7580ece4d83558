//! `passman delete`: remove an entry from the store.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{PassmanError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let mut session = Session::open(cli)?;

    if !session.store.contains(id) {
        return Err(PassmanError::EntryNotFound(id.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{id}'?"))
            .default(false)
            .interact()
            .map_err(|e| PassmanError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.store.remove(id)?;
    session.save()?;

    output::success(&format!("Deleted entry '{id}'"));

    Ok(())
}
