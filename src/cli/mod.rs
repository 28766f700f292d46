//! CLI command implementations
//!
//! - `table`: commands over a single table file (normalize, run, generate, validate)
//! - `config`: schema output
//! - `util`: shared argument and I/O helpers

pub mod config;
pub mod table;
pub mod util;

pub use config::cmd_schema;
pub use table::{cmd_generate, cmd_normalize, cmd_run, cmd_validate};
