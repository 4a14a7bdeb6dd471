use std::process::ExitCode;

use qabot::cli;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = cli::run().await {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
