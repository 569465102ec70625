use anyhow::Result;
use clap::Parser;
use core_logic::setup_logger;
use dotenv::dotenv;
use tracing::error;
use wallet_assets::Args;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Guard flushes the log file on drop
    let guard = setup_logger(args.verbose, args.log_file.as_deref())?;

    let summary = wallet_assets::run(&args).await?;

    if summary.all_failed() {
        error!("All {} requested networks failed", summary.outcomes.len());
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
