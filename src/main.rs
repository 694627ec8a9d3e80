//! SensorView - command line entry point
//!
//! Lists recording days and sessions, and pages through a session's signal
//! printing a summary of every window it renders.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use sensorview::{
    backend::{DataSource, HttpDataSource},
    config::AppConfig,
    frontend::TextRenderer,
    history::{
        HistoryView, LoadKind, Navigation, StepDirection, ViewOptions, WindowFetcher, WindowSize,
    },
    HistoryDate, SessionId, Signal,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "sensorview", version, about = "Browse recorded sensor sessions")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the server base URL
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List days with recordings
    Dates,
    /// List sessions recorded on a day
    Sessions {
        /// Day in YYYYMMDD form
        date: HistoryDate,
    },
    /// Page through one signal of a session
    Browse {
        /// Session id in YYYYMMDD_HHMMSS form
        session: SessionId,
        /// ECG, ADC or TEMP
        signal: Signal,
        /// Samples per window, or "all"
        #[arg(long)]
        window: Option<WindowSize>,
        /// Start at this sample offset
        #[arg(long)]
        at: Option<usize>,
        /// Navigation steps to apply in order: start, prev, next, end
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<StepDirection>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sensorview=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    config.validate()?;

    tracing::info!("Using history server at {}", config.server.base_url);
    let source: Arc<dyn DataSource> = Arc::new(HttpDataSource::new(
        &config.server.base_url,
        config.server.timeout(),
    )?);

    match cli.command {
        Command::Dates => {
            for entry in source.list_dates().await? {
                println!("{}  {}", entry.date, entry.label);
            }
        }
        Command::Sessions { date } => {
            for session in source.list_sessions_for_date(date).await? {
                let totals = session
                    .total_samples
                    .iter()
                    .map(|(signal, count)| format!("{}={}", signal, count))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "{}  {:<9}  {}",
                    session.id,
                    session.status.display_name(),
                    totals
                );
            }
        }
        Command::Browse {
            session,
            signal,
            window,
            at,
            steps,
        } => {
            let sessions = source
                .list_sessions_for_date(session.date())
                .await
                .context("Failed to look up session")?;
            let selected = sessions
                .into_iter()
                .find(|s| s.id == session)
                .ok_or_else(|| anyhow!("session {} not found", session))?;

            let mut options = ViewOptions::from(&config);
            if let Some(window) = window {
                options.window_size = window;
            }

            let mut view = HistoryView::new(selected, signal, options);
            let fetcher = WindowFetcher::new(source);
            let mut renderer = TextRenderer::new(std::io::stdout());

            let mut navigation: Vec<Navigation> = Vec::new();
            if let Some(offset) = at {
                navigation.push(Navigation::JumpTo(offset));
            }
            navigation.extend(steps.into_iter().map(Navigation::Step));

            let request = view.reload(LoadKind::UserInitiated);
            report(view.load(&fetcher, request, &mut renderer).await.notice());

            for nav in navigation {
                let Some(request) = view.navigate(nav, LoadKind::UserInitiated) else {
                    continue;
                };
                report(view.load(&fetcher, request, &mut renderer).await.notice());
            }

            let store = view.store();
            println!(
                "position {} / {} (window {})",
                store.position(),
                store.total_count(),
                store.window_size()
            );
        }
    }

    Ok(())
}

fn report(notice: Option<&sensorview::history::Notice>) {
    if let Some(notice) = notice {
        eprintln!("{}", notice);
    }
}
