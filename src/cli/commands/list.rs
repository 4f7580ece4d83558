//! `passman list`: display entries in a table.

use regex::Regex;

use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::errors::{PassmanError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, pattern: Option<&str>) -> Result<()> {
    // Compile first so a bad pattern does not cost a key derivation.
    let pattern = pattern
        .map(Regex::new)
        .transpose()
        .map_err(|e| PassmanError::InvalidArgument(format!("invalid pattern: {e}")))?;

    let session = Session::open(cli)?;
    let store = &session.store;

    let ids = store.ids(pattern.as_ref());
    output::info(&format!(
        "{} of {} entr{}",
        ids.len(),
        store.len(),
        if store.len() == 1 { "y" } else { "ies" }
    ));

    output::print_entries_table(
        ids.into_iter()
            .filter_map(|id| store.get(id).map(|entry| (id, entry))),
    );

    Ok(())
}
