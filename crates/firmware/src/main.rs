//! Matrix Show - desktop host driver
//!
//! Runs the show against a flash image dump and draws the matrices in the
//! terminal. Build an image with `cargo xtask pack-content`.
//!
//! ```bash
//! RUST_LOG=info cargo run -p firmware --features emulator -- content.bin --random
//! ```

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use firmware::{Show, TerminalSurface};
use platform::clock::SystemClock;
use platform::config::{self, DEFAULT_RANDOM_INTERVAL_MS};
use platform::flash_image::FileFlash;

#[derive(Parser)]
#[command(name = "matrix-show", version, about = "LED matrix show on the desktop")]
struct Cli {
    /// Flash image written by `cargo xtask pack-content`
    image: PathBuf,

    /// Outer loop period in milliseconds
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Pick entries at random (otherwise walk --playlist)
    #[arg(long)]
    random: bool,

    /// Gap before the first pick, in milliseconds
    #[arg(long, default_value_t = DEFAULT_RANDOM_INTERVAL_MS)]
    interval_ms: u32,

    /// Only schedule entries with this theme
    #[arg(long)]
    theme: Option<String>,

    /// Entry ids to play in order, comma separated
    #[arg(long, value_delimiter = ',')]
    playlist: Vec<u16>,

    /// Render this entry once at startup
    #[arg(long)]
    play: Option<u16>,

    /// Print the catalog and exit
    #[arg(long)]
    list: bool,

    /// Stop after this many seconds
    #[arg(long)]
    seconds: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not tear the frames on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("{} v{}", config::app_title(), config::APP_VERSION);

    let flash = FileFlash::open(&cli.image)
        .with_context(|| format!("cannot open flash image {}", cli.image.display()))?;
    let surface = TerminalSurface::new(std::io::stdout());
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(0));
    let mut show = Show::new(flash, surface, SystemClock::new(), seed);
    show.build_catalog();

    if cli.list {
        list(&show);
        return Ok(());
    }

    show.set_random_interval(cli.interval_ms);
    if let Some(theme) = cli.theme.as_deref() {
        show.set_theme_filter(theme);
    }
    if !cli.playlist.is_empty() {
        show.set_playlist(cli.playlist.clone());
    }
    if let Some(id) = cli.play {
        if !show.render_entry(id) {
            tracing::warn!(id, "startup render failed");
        }
    }
    show.set_schedule_enabled(true);
    show.set_random_enabled(cli.random);

    let mut ticker = tokio::time::interval(Duration::from_millis(cli.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let deadline = cli.seconds.map(Duration::from_secs);
    let started = tokio::time::Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = show.tick();
                tracing::trace!(?outcome, "tick");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
        if deadline.is_some_and(|d| started.elapsed() >= d) {
            break;
        }
    }

    tracing::info!(frames = show.surface().frames(), "show stopped");
    Ok(())
}

fn list<F, S, C>(show: &Show<F, S, C>)
where
    F: platform::FlashRegion,
    S: platform::DisplaySurface,
    C: platform::Clock,
{
    for entry in show.entries() {
        tracing::info!(
            id = entry.id,
            kind = entry.kind.label(),
            theme = %entry.theme,
            duration_ms = entry.duration_ms,
            "{}",
            entry.name
        );
    }
    let themes: Vec<&str> = show.themes().iter().collect();
    tracing::info!(themes = ?themes, "{} entries", show.entries().len());
}
