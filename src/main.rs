use std::process::ExitCode;

use ltr_hotkeyd::cli::Cli;
use ltr_hotkeyd::daemon;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse_lenient();

    match daemon::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let Some(hint) = e.remediation() {
                error!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
