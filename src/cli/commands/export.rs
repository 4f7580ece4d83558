//! `passman export`: write the decrypted store as pretty JSON.
//!
//! The document carries the KDF parameters and every entry. Secrets are
//! base64, exactly as inside the encrypted document.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Session};
use crate::crypto::ScryptParams;
use crate::errors::{PassmanError, Result};
use crate::store::{Entry, Store};

#[derive(Serialize)]
struct ExportDocument<'a> {
    params: &'a ScryptParams,
    entries: &'a BTreeMap<String, Entry>,
}

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&Path>) -> Result<()> {
    // Check the destination before asking for the passphrase.
    if let Some(dest) = output_path {
        if dest.exists() {
            return Err(PassmanError::CommandFailed(format!(
                "refusing to overwrite existing file {}",
                dest.display()
            )));
        }
    }

    let session = Session::open(cli)?;
    let content = render(&session.store)?;

    match output_path {
        Some(dest) => {
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(dest).map_err(|e| {
                PassmanError::CommandFailed(format!("failed to create export file: {e}"))
            })?;
            file.write_all(content.as_bytes())?;

            output::success(&format!(
                "Exported {} entries to {}",
                session.store.len(),
                dest.display()
            ));
            output::warning("The export file is not encrypted.");
        }
        None => {
            // Raw output only, so it can be piped.
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn render(store: &Store) -> Result<Zeroizing<String>> {
    let doc = ExportDocument {
        params: store.params(),
        entries: store.entries(),
    };
    let mut json = serde_json::to_string_pretty(&doc)
        .map_err(|e| PassmanError::Serialization(format!("export: {e}")))?;
    json.push('\n');
    Ok(Zeroizing::new(json))
}
