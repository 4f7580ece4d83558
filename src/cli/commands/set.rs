//! `passman set`: create or modify an entry.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{parse_key_value, Cli, Session};
use crate::crypto::SecretBytes;
use crate::errors::{PassmanError, Result};
use crate::store::Entry;

/// Changes requested on the command line.
pub struct SetArgs<'a> {
    pub name: Option<&'a str>,
    pub meta: &'a [String],
    pub rename: Option<&'a str>,
    pub password: bool,
}

impl SetArgs<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.meta.is_empty() && self.rename.is_none() && !self.password
    }
}

/// Execute the `set` command.
pub fn execute(cli: &Cli, id: &str, args: &SetArgs<'_>) -> Result<()> {
    // Validate metadata before touching the store.
    let meta = args
        .meta
        .iter()
        .map(|m| parse_key_value(m))
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::open(cli)?;

    let exists = session.store.contains(id);
    if exists && args.is_empty() {
        return Err(PassmanError::InvalidArgument(format!(
            "nothing to change for '{id}'"
        )));
    }
    if let Some(new_id) = args.rename {
        if !exists {
            return Err(PassmanError::EntryNotFound(id.to_string()));
        }
        if session.store.contains(new_id) {
            return Err(PassmanError::EntryAlreadyExists(new_id.to_string()));
        }
    }

    // New entries always get a password.
    let secret = if args.password || !exists {
        Some(read_secret(id)?)
    } else {
        None
    };

    if !exists {
        let entry = Entry::new(args.name.unwrap_or_default(), SecretBytes::default());
        session.store.insert(id, entry)?;
    }

    let entry = session
        .store
        .get_mut(id)
        .ok_or_else(|| PassmanError::EntryNotFound(id.to_string()))?;
    if let Some(name) = args.name {
        entry.set_name(name);
    }
    for (key, value) in meta {
        entry.set_metadata(key, value);
    }
    if let Some(secret) = secret {
        entry.set_secret(secret);
    }

    let final_id = match args.rename {
        Some(new_id) => {
            session.store.rename(id, new_id)?;
            new_id
        }
        None => id,
    };

    session.save()?;

    let verb = if exists { "updated" } else { "added" };
    output::success(&format!(
        "Entry '{final_id}' {verb} ({} total)",
        session.store.len()
    ));

    Ok(())
}

/// Read the secret from piped stdin, or from a hidden prompt.
fn read_secret(id: &str) -> Result<SecretBytes> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(SecretBytes::from(buf.trim_end_matches(['\r', '\n'])));
    }

    let password = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt(format!("Enter password for '{id}'"))
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| PassmanError::CommandFailed(format!("input prompt: {e}")))?,
    );
    Ok(SecretBytes::from(password.as_str()))
}
