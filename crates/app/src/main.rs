mod demo;
mod input;
mod logging;
mod session;
mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use phrase_board_core::{
    BoardConfig, Clock, Dashboard, LayoutEngine, ManualClock, Size, SystemClock,
};

use crate::{
    demo::DemoSource,
    input::{Action, UiState},
    logging::LogBuffer,
    session::Session,
    terminal::TerminalSession,
};

fn main() -> phrase_board_core::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };

    let logs = LogBuffer::new(config.log_lines.max(1) * 4);
    logging::init_tracing(logs.clone());

    match cli.command {
        Commands::Run { session, tick_ms } => {
            if let Some(tick_ms) = tick_ms {
                config.tick_ms = tick_ms;
            }
            run_dashboard(&config, session.as_ref(), &logs)
        }
        Commands::Snapshot {
            session,
            width,
            height,
            at_ms,
        } => run_snapshot(&config, session.as_ref(), Size::new(width, height), at_ms),
    }
}

fn load_source(session: Option<&PathBuf>, now_ms: i64) -> phrase_board_core::Result<DemoSource> {
    Ok(match session {
        Some(path) => DemoSource::from_session(Session::load(path)?, now_ms),
        None => DemoSource::sample(now_ms),
    })
}

fn run_dashboard(
    config: &BoardConfig,
    session: Option<&PathBuf>,
    logs: &LogBuffer,
) -> phrase_board_core::Result<()> {
    let clock = SystemClock;
    let mut source = load_source(session, clock.now_ms())?;
    let tick = Duration::from_millis(config.tick_ms.max(1));
    tracing::info!(tick_ms = config.tick_ms, "starting dashboard");

    let _session = TerminalSession::enter()?;
    let mut board = Dashboard::new(io::stdout(), config);
    let mut ui = UiState::default();

    loop {
        let started = Instant::now();
        let now_ms = clock.now_ms();
        source.tick(now_ms);

        let state = ui.board_state(&source, logs.lines(), now_ms);
        let scroll = board.render_train_board(&state, TerminalSession::size()?, now_ms)?;
        ui.apply_scroll(scroll);

        let budget = tick.saturating_sub(started.elapsed());
        if !event::poll(budget)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match ui.handle_key(key) {
                Action::Quit => break,
                Action::TogglePlayback => source.toggle_playback(clock.now_ms()),
                Action::NextTrack => source.next_track(clock.now_ms()),
                Action::ResetBoard => {
                    tracing::debug!("board reset");
                    board.replay_flaps();
                }
                Action::Continue => {}
            },
            // The dashboard notices the new size on the next tick and repaints.
            Event::Resize(width, height) => tracing::debug!(width, height, "resize event"),
            _ => {}
        }
    }

    tracing::info!("dashboard closed");
    Ok(())
}

/// Prints one composed frame as plain sequential lines, for piping or
/// eyeballing layouts without taking over the terminal.
fn run_snapshot(
    config: &BoardConfig,
    session: Option<&PathBuf>,
    size: Size,
    at_ms: Option<i64>,
) -> phrase_board_core::Result<()> {
    let clock = ManualClock::at(at_ms.unwrap_or_else(|| SystemClock.now_ms()));
    let source = load_source(session, clock.now_ms())?;
    let state = UiState::default().board_state(&source, Vec::new(), clock.now_ms());
    let composition = LayoutEngine::new(config).compose(&state, size, clock.now_ms());

    let mut stdout = io::stdout().lock();
    for row in &composition.rows {
        row.write_to(&mut stdout)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Live phrase countdown and mix suggestions for DJs", long_about = None)]
struct Cli {
    /// Optional JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive dashboard.
    Run {
        /// Session snapshot to replay instead of the built-in demo deck.
        #[arg(short, long)]
        session: Option<PathBuf>,
        /// Override the render interval in milliseconds.
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Render a single frame to stdout and exit.
    Snapshot {
        #[arg(short, long)]
        session: Option<PathBuf>,
        #[arg(long, default_value_t = 100)]
        width: u16,
        #[arg(long, default_value_t = 40)]
        height: u16,
        /// Wall-clock time to render at, in epoch milliseconds.
        #[arg(long)]
        at_ms: Option<i64>,
    },
}
