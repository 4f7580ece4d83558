//! `passman get`: show a single entry, including its password.

use crate::cli::{output, Cli, Session};
use crate::errors::{PassmanError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let session = Session::open(cli)?;

    let entry = session
        .store
        .get(id)
        .ok_or_else(|| PassmanError::EntryNotFound(id.to_string()))?;
    output::print_entry(id, entry);

    Ok(())
}
