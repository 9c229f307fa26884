mod config;
mod errors;
mod feeds;
mod payoff;
mod report;
mod server;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use crate::errors::{SimError, SimResult};
use crate::session::SimulationSession;
use crate::state::AppState;

enum Command {
    Serve,
    Report(SimulationSession),
}

/// Decide what to run before anything touches config or the network.
fn parse_command(args: &[String]) -> SimResult<Command> {
    match args.first().map(String::as_str) {
        None | Some("serve") => Ok(Command::Serve),
        Some("report") => Ok(Command::Report(report::parse_report_args(&args[1..])?)),
        Some(other) => Err(SimError::Validation(format!(
            "unknown command: {other}\nusage: put_sim [serve]\n       {}",
            report::USAGE
        ))),
    }
}

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let provider = match feeds::build_provider(&cfg) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("price provider error: {e}");
            std::process::exit(1);
        }
    };

    match command {
        Command::Serve => serve(AppState::new(cfg, provider)).await,
        Command::Report(session) => {
            if let Err(e) = run_report(&session, provider.as_ref()).await {
                tracing::error!("report failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn serve(state: std::sync::Arc<AppState>) {
    let addr = state.config.bind_addr();
    tracing::info!(
        provider = state.provider.id(),
        static_dir = %state.config.static_dir.display(),
        "put_sim server starting"
    );

    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    tracing::info!("server listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}

/// One-shot terminal run: fetch the price once, print summaries and payoff tables.
async fn run_report(session: &SimulationSession, provider: &dyn feeds::PriceProvider) -> SimResult<()> {
    let current_price = provider.latest_price(session.ticker()).await?;
    tracing::info!(ticker = %session.ticker(), price = current_price, "current price resolved");

    let result = session.simulate(current_price)?;
    print!("{}", report::render(&result));
    Ok(())
}
