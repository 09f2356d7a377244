use devsecops_ai_lib::commands::analyze;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    devsecops_ai_lib::init_logging();
    analyze::run_analysis().await
}
