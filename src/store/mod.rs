//! Store layer: binary header, entry model, authenticated codec and
//! file persistence.

pub mod codec;
pub mod entry;
pub mod file;
pub mod header;
pub mod model;

pub use codec::{decode, encode, encode_to_vec};
pub use entry::{format_age, Entry};
pub use file::{create_store, read_header, read_store, write_store, StoreInfo};
pub use header::{Header, CURRENT_VERSION, SIGNATURE};
pub use model::Store;
