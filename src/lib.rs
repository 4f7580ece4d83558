pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod passgen;
pub mod store;

pub use errors::{PassmanError, Result};
pub use store::{decode, encode, Entry, Header, Store};
