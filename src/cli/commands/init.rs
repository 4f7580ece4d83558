//! `passman init`: create a new, empty store.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_passphrase, store_path, Cli};
use crate::errors::{PassmanError, Result};
use crate::store::{self, Store};

/// Execute the `init` command.
pub fn execute(cli: &Cli, log_n: Option<u8>, r: Option<u32>, p: Option<u32>) -> Result<()> {
    let mut settings = load_settings()?;
    let path = store_path(cli, &settings)?;

    // 1. Refuse to clobber an existing store before asking for anything.
    if path.exists() {
        output::tip("Use `passman set <id>` to add entries to the existing store.");
        return Err(PassmanError::StoreAlreadyExists(path));
    }

    // 2. Flags override the configured KDF costs.
    if let Some(log_n) = log_n {
        settings.scrypt_log_n = log_n;
    }
    if let Some(r) = r {
        settings.scrypt_r = r;
    }
    if let Some(p) = p {
        settings.scrypt_p = p;
    }
    let params = settings.scrypt_params()?;

    // 3. Passphrase (entered twice), then write the empty store.
    let passphrase = prompt_new_passphrase()?;
    let mut store = Store::new(params)?;
    store::create_store(&path, &mut store, passphrase.as_bytes())?;

    output::success(&format!("Store created at {}", path.display()));
    output::tip("Run `passman set <id>` to add an entry.");

    Ok(())
}
