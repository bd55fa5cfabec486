use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    threadpilot_cli::run().await
}
