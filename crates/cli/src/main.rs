use std::process::ExitCode;

fn main() -> ExitCode {
    workforce_cli::run()
}
