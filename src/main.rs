// src/main.rs

use paircheck::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("paircheck error: {err:?}");
        std::process::exit(1);
    }

    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "check run aborted");
        std::process::exit(1);
    }
}
