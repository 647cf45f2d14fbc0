use std::process::ExitCode;

fn main() -> ExitCode {
    orcapro_cli::run()
}
