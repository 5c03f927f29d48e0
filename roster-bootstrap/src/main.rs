use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "roster-daemon")]
#[command(about = "Valheim Player Roster Daemon", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Print the stored roster and exit without scanning
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("ROSTER_CONFIG", config);
    }

    if args.list {
        roster_bootstrap::run_list().await
    } else {
        roster_bootstrap::run_daemon().await
    }
}
