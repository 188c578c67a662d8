pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{config_dir, config_file, data_dir, database_file, ensure_dirs, log_file};
pub use paths::{expand_tilde, format_path_with_tilde, shorten_directory};
pub use terminal::{preview_lines, strip_ansi_codes};
