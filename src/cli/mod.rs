pub mod commands;

pub use commands::{Cli, EXIT_CANCELLED, EXIT_EXECUTE, run};
