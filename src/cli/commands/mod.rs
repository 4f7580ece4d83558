//! One module per subcommand, each exposing an `execute` function.

pub mod clip;
pub mod completions;
pub mod delete;
pub mod export;
pub mod gen;
pub mod get;
pub mod init;
pub mod list;
pub mod set;
pub mod set_param;
pub mod stat;
