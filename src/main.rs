use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;

use facegif::{
    ConfidenceMap, Expression, FaceReading, FacegifConfig, PollLoop, ScriptedDetector,
    SlotDisplay, TestPatternSource,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "facegif", about = "Expression-matched gif display daemon")]
struct Cli {
    /// Path to the expressions gifs catalog
    #[arg(long, default_value = "expressionsgifs.json")]
    catalog: PathBuf,

    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Gifs sampled, and slots filled, per tick
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Logging verbosity level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

/// Waits for either `Ctrl+C` or `SIGTERM` (on Unix).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Demo detector cycling through a few moods so the pipeline has
/// something to react to without a real camera.
fn demo_detector() -> ScriptedDetector {
    let reading = |scores: &[(Expression, f32)]| {
        Some(FaceReading::new(
            scores.iter().copied().collect::<ConfidenceMap>(),
        ))
    };
    ScriptedDetector::new(vec![
        reading(&[(Expression::Happy, 0.8), (Expression::Neutral, 0.2)]),
        reading(&[(Expression::Neutral, 0.6), (Expression::Sad, 0.3)]),
        None,
        reading(&[(Expression::Surprised, 0.7), (Expression::Happy, 0.2)]),
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::from(cli.log_level))
        .init();

    let config = FacegifConfig {
        interval: Duration::from_millis(cli.interval_ms),
        sample_count: cli.count,
        slot_count: cli.count,
        ..FacegifConfig::default()
    };

    let mut poll = PollLoop::new(
        config,
        cli.catalog,
        Arc::new(demo_detector()),
        Box::new(TestPatternSource::new()),
        Box::new(SlotDisplay::new(cli.count)),
    )?;

    let stop = poll.stop_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        stop.stop();
    });

    poll.run().await
}
