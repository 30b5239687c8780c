use std::time::Duration;

use clap::Subcommand;
use focusquest_core::storage::Database;
use focusquest_core::timer::now_ms;
use focusquest_core::{App, Config, Event, TimerClock};
use serde::Serialize;

use super::{print_json, today, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Back to a paused focus phase
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Drive the timer in the foreground until interrupted
    Run {
        /// Stop after this many phase changes
        #[arg(long)]
        phases: Option<u32>,
    },
}

#[derive(Serialize)]
struct TimerStatus {
    phase: focusquest_core::Phase,
    running: bool,
    remaining_secs: u64,
    display: String,
    progress_pct: f64,
}

impl TimerStatus {
    fn of(clock: &TimerClock) -> Self {
        let timer = clock.timer();
        Self {
            phase: timer.phase(),
            running: timer.is_running(),
            remaining_secs: timer.remaining_secs(),
            display: timer.display(),
            progress_pct: timer.progress_pct(),
        }
    }
}

/// Hand focus completions to the tracker and echo every event.
fn report(app: &mut App<'_>, events: &[Event]) {
    app.handle_events(events, today());
    for event in events {
        eprintln!("{}", event.headline());
    }
}

pub fn run(action: TimerAction) -> CmdResult {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut app = App::load(&db);
    let mut clock = app.load_timer(&config.timer);

    // Time that passed since the last invocation counts first.
    let events = clock.advance();
    report(&mut app, &events);

    match action {
        TimerAction::Start => {
            if let Some(event) = clock.start(now_ms()) {
                print_json(&event)?;
            } else {
                print_json(&TimerStatus::of(&clock))?;
            }
        }
        TimerAction::Pause => {
            let events = clock.pause(now_ms());
            report(&mut app, &events);
            print_json(&TimerStatus::of(&clock))?;
        }
        TimerAction::Reset => {
            print_json(&clock.reset())?;
        }
        TimerAction::Status => {
            print_json(&TimerStatus::of(&clock))?;
        }
        TimerAction::Run { phases } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(drive(&mut app, &mut clock, phases))?;
        }
    }

    app.save_timer(&clock)?;
    app.flush()?;
    Ok(())
}

async fn drive(app: &mut App<'_>, clock: &mut TimerClock, phases: Option<u32>) -> CmdResult {
    clock.start(now_ms());
    let mut interval = tokio::time::interval(Duration::from_millis(250));
    let mut changes = 0u32;
    let mut last_display = String::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let events = clock.advance();
                report(app, &events);
                changes += events
                    .iter()
                    .filter(|e| matches!(e, Event::PhaseChanged { .. }))
                    .count() as u32;

                let display = clock.timer().display();
                if display != last_display {
                    eprint!("\r{} {}  ", clock.timer().phase().label(), display);
                    last_display = display;
                }
                if !events.is_empty() {
                    app.save_timer(clock)?;
                }
                if phases.is_some_and(|limit| changes >= limit) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    eprintln!();
    let events = clock.pause(now_ms());
    report(app, &events);
    print_json(&TimerStatus::of(clock))
}
