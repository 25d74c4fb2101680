use std::process::ExitCode;

fn main() -> ExitCode {
    kairos::cli::run_cli()
}
