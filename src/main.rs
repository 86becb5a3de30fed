// Trip Concierge
// Reads user turns from stdin and prints replies for one session.

use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use trip_concierge::bootstrap;
use trip_concierge::config::AppConfig;
use trip_concierge::domain::foundation::SessionId;
use trip_concierge::telemetry::init_telemetry;

/// Conversational Jeju trip planner
#[derive(Parser, Debug)]
#[command(name = "trip-concierge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Session id to use; a fresh one is generated when omitted
    #[arg(long, value_name = "ID")]
    session: Option<String>,

    /// Probe the retrieval service and exit
    #[arg(long)]
    check: bool,

    /// Skip the diagnostics line after each reply
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    config.validate()?;
    init_telemetry(&config.telemetry);

    let runtime = bootstrap::build(&config).await?;

    if cli.check {
        let health = runtime.retrieval.diagnose().await;
        println!("{}", serde_json::to_string_pretty(&health)?);
        if !health.is_healthy() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let session_id = match cli.session {
        Some(id) => SessionId::new(id)?,
        None => SessionId::generate(),
    };
    tracing::info!(%session_id, "session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "quit" | "exit" | "종료") {
            break;
        }

        let outcome = runtime.orchestrator.handle_turn(&session_id, message).await;
        writeln!(stdout, "{}", outcome.response)?;
        if !cli.quiet {
            writeln!(stdout, "{}", serde_json::to_string(&outcome.diagnostics)?)?;
        }
        stdout.flush()?;
    }

    Ok(())
}
