use std::process::ExitCode;

fn main() -> ExitCode {
    match histsearch::cli::run() {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(err) => {
            eprintln!("histsearch: {:#}", err);
            ExitCode::from(histsearch::cli::EXIT_CANCELLED as u8)
        }
    }
}
