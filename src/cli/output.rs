//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::store::{format_age, Entry};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Id, Name, Age). Never shows secrets.
pub fn print_entries_table<'a>(rows: impl IntoIterator<Item = (&'a str, &'a Entry)>) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Age"]);

    let mut empty = true;
    for (id, entry) in rows {
        empty = false;
        table.add_row(vec![
            id.to_string(),
            entry.name.clone(),
            format_age(entry.age()),
        ]);
    }

    if empty {
        info("No matching entries.");
        return;
    }

    println!("{table}");
}

/// Print an entry's fields followed by its password.
pub fn print_entry(id: &str, entry: &Entry) {
    println!("{}", style(id).bold());
    println!("{entry}");
    println!(
        "password: {}",
        String::from_utf8_lossy(entry.secret.expose())
    );
}
