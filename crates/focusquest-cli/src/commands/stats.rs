use clap::Subcommand;
use focusquest_core::stats::heatmap::DEFAULT_DAYS;
use focusquest_core::storage::Database;
use focusquest_core::{ActivityTracker, App};
use serde::Serialize;

use super::{print_json, today, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streak, totals and today's minutes
    Show,
    /// Daily focus minutes for recent days
    Heatmap {
        /// Number of days ending today
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
        /// Print intensity glyphs instead of JSON
        #[arg(long)]
        grid: bool,
    },
}

#[derive(Serialize)]
struct StatsView<'a> {
    #[serde(flatten)]
    stats: &'a focusquest_core::Stats,
    hours: u64,
    minutes: u64,
    today_minutes: u32,
    streak_message: &'static str,
    tasks_completed_today: usize,
}

pub fn run(action: StatsAction) -> CmdResult {
    let db = Database::open()?;
    let today = today();

    match action {
        StatsAction::Show => {
            let app = App::load(&db);
            let stats = app.activity.stats();
            let (hours, minutes) = stats.hours_and_minutes();
            print_json(&StatsView {
                stats,
                hours,
                minutes,
                today_minutes: stats.minutes_on(today),
                streak_message: stats.tier().message(),
                tasks_completed_today: app.tasks.summary(&chrono::Local::now()).completed_today,
            })?;
        }
        StatsAction::Heatmap { days, grid } => {
            let heatmap = ActivityTracker::load(&db).heatmap(today, days);
            if grid {
                println!("{}", heatmap.render());
            } else {
                print_json(&heatmap)?;
            }
        }
    }
    Ok(())
}
