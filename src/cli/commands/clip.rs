//! `passman clip`: put one entry field on the system clipboard.
//!
//! The value stays on the clipboard until the timeout expires, then the
//! clipboard is cleared if it still holds that value.

use zeroize::Zeroizing;

use crate::cli::{Cli, Session};
use crate::errors::{PassmanError, Result};
use crate::store::Entry;

/// Execute the `clip` command.
pub fn execute(cli: &Cli, id: &str, field: &str, timeout: Option<u64>) -> Result<()> {
    let session = Session::open(cli)?;

    let entry = session
        .store
        .get(id)
        .ok_or_else(|| PassmanError::EntryNotFound(id.to_string()))?;
    let value = field_value(entry, field)?;
    let timeout = timeout.unwrap_or(session.settings.clip_timeout_secs);

    deliver(id, field, &value, timeout)
}

/// Resolve `field` to its value. Built-in fields win over metadata keys.
fn field_value(entry: &Entry, field: &str) -> Result<Zeroizing<String>> {
    let value = match field {
        "password" => entry
            .secret
            .expose_str()
            .ok_or_else(|| PassmanError::Clipboard("password is not valid UTF-8 text".into()))?
            .to_string(),
        "name" => entry.name.clone(),
        other => match entry.metadata.get(other) {
            Some(value) => value.clone(),
            None => {
                let mut fields = vec!["\"password\"".to_string(), "\"name\"".to_string()];
                fields.extend(entry.metadata.keys().map(|k| format!("{k:?}")));
                return Err(PassmanError::InvalidArgument(format!(
                    "invalid field {other:?} (possible fields: {})",
                    fields.join(", ")
                )));
            }
        },
    };
    Ok(Zeroizing::new(value))
}

#[cfg(feature = "clipboard")]
fn deliver(id: &str, field: &str, value: &str, timeout: u64) -> Result<()> {
    use std::thread;
    use std::time::Duration;

    use arboard::Clipboard;
    use tracing::debug;

    use crate::cli::output;

    let clip_err = |e: arboard::Error| PassmanError::Clipboard(e.to_string());

    let mut clipboard = Clipboard::new().map_err(clip_err)?;
    clipboard.set_text(value.to_string()).map_err(clip_err)?;
    output::success(&format!("Copied {field} of '{id}' to the clipboard."));

    if timeout == 0 {
        return Ok(());
    }

    output::info(&format!("Clearing in {timeout}s..."));
    thread::sleep(Duration::from_secs(timeout));

    // Leave the clipboard alone if something else was copied meanwhile.
    let current = clipboard.get_text().map(Zeroizing::new);
    match current {
        Ok(text) if text.as_str() == value => {
            clipboard.clear().map_err(clip_err)?;
            output::info("Clipboard cleared.");
        }
        Ok(_) => debug!("clipboard changed, not clearing"),
        Err(e) => debug!(error = %e, "could not read clipboard back"),
    }

    Ok(())
}

#[cfg(not(feature = "clipboard"))]
fn deliver(_id: &str, _field: &str, _value: &str, _timeout: u64) -> Result<()> {
    Err(PassmanError::Clipboard(
        "passman was built without the `clipboard` feature".into(),
    ))
}
