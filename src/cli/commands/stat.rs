//! `passman stat`: show store file metadata without decrypting anything.

use console::style;

use crate::cli::{load_settings, store_path, Cli};
use crate::errors::Result;
use crate::store::{self, SIGNATURE};

/// Execute the `stat` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = store_path(cli, &settings)?;
    let info = store::read_header(&path)?;
    let header = &info.header;
    let params = header.params();

    let modified = info
        .modified
        .map(|t| t.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let iterations = params
        .iterations()
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("2^{}", params.log_n));

    println!(
        "{:<14}: {} ({} bytes)",
        style("File").bold(),
        info.path.display(),
        info.size
    );
    println!("{:<14}: {modified}", style("Last modified").bold());
    println!(
        "{:<14}: {} (version {})",
        style("Signature").bold(),
        hex(SIGNATURE),
        header.version()
    );
    println!("{:<14}: {}", style("Salt").bold(), hex(header.salt()));
    println!(
        "{:<14}: N={iterations} r={} p={}",
        style("Scrypt params").bold(),
        params.r,
        params.p
    );

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
