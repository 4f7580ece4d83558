//! `passman set-param`: change a scrypt cost and re-encrypt the store.

use std::time::Instant;

use tracing::info;

use crate::cli::output;
use crate::cli::{Cli, KdfParam, Session};
use crate::crypto::{derive_keys, ScryptParams, SALT_LEN};
use crate::errors::{PassmanError, Result};

/// Execute the `set-param` command.
pub fn execute(cli: &Cli, param: KdfParam, value: u32) -> Result<()> {
    let mut session = Session::open(cli)?;

    let params = apply(*session.store.params(), param, value)?;

    // Time one derivation with the new costs before committing to them.
    output::info("Verifying parameters...");
    let started = Instant::now();
    derive_keys(&[], &[0u8; SALT_LEN], &params)?;
    let elapsed = started.elapsed();
    info!(?elapsed, log_n = params.log_n, r = params.r, p = params.p, "trial derivation");
    output::info(&format!("Key derivation took {elapsed:.2?}"));

    session.store.set_params(params)?;
    session.save()?;

    output::success(&format!(
        "Scrypt params now N=2^{} r={} p={}",
        params.log_n, params.r, params.p
    ));

    Ok(())
}

/// Return `current` with one field replaced, validated.
fn apply(current: ScryptParams, param: KdfParam, value: u32) -> Result<ScryptParams> {
    let mut params = current;
    match param {
        KdfParam::LogN => {
            params.log_n = u8::try_from(value).map_err(|_| {
                PassmanError::InvalidArgument(format!("log-n {value} does not fit in a byte"))
            })?;
        }
        KdfParam::R => params.r = value,
        KdfParam::P => params.p = value,
    }
    params.validate()?;
    Ok(params)
}
