//! `passman gen`: print random passwords with an entropy estimate.

use console::style;

use crate::cli::load_settings;
use crate::errors::Result;
use crate::passgen::{self, CharSet};

/// Execute the `gen` command. Needs no store.
pub fn execute(length: Option<usize>, count: usize, charset: CharSet) -> Result<()> {
    let length = match length {
        Some(length) => length,
        None => load_settings()?.gen_length,
    };

    for _ in 0..count {
        let password = passgen::generate(length, charset)?;
        let bits = passgen::entropy(password.as_bytes());
        println!(
            "{}  {}",
            password.as_str(),
            style(format!("({bits:.1} bits)")).dim()
        );
    }

    Ok(())
}
