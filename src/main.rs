use std::process::ExitCode;

use clap::Parser;

use mission_architect_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match mission_architect_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Errors go to stderr in the same `{ kind, message }` shape a
            // frontend would receive.
            match serde_json::to_string(&e) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("error: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}
