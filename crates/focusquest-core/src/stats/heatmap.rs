//! Calendar heatmap of daily focus minutes.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Days shown when the caller has no preference.
pub const DEFAULT_DAYS: u32 = 90;

/// One calendar day in the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub minutes: u32,
    /// 0 = none, 1 = under 30 min, 2 = under 60, 3 = under 120, 4 = more.
    pub intensity: u8,
}

/// Intensity bucket for a day's minutes.
pub fn intensity(minutes: u32) -> u8 {
    match minutes {
        0 => 0,
        1..=29 => 1,
        30..=59 => 2,
        60..=119 => 3,
        _ => 4,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    /// Oldest day first, ending with `today`.
    pub cells: Vec<HeatmapCell>,
}

impl Heatmap {
    /// Build the last `days` calendar days ending at `today` (inclusive).
    pub fn build(activity: &BTreeMap<NaiveDate, u32>, today: NaiveDate, days: u32) -> Self {
        let cells = (0..i64::from(days))
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let minutes = activity.get(&date).copied().unwrap_or(0);
                HeatmapCell {
                    date,
                    minutes,
                    intensity: intensity(minutes),
                }
            })
            .collect();
        Self { cells }
    }

    /// Cells chunked into rows of seven; the last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[HeatmapCell]> {
        self.cells.chunks(7)
    }

    pub fn active_days(&self) -> usize {
        self.cells.iter().filter(|c| c.minutes > 0).count()
    }

    /// Render as rows of intensity glyphs, one row per week.
    pub fn render(&self) -> String {
        const GLYPHS: [char; 5] = ['.', '░', '▒', '▓', '█'];
        self.weeks()
            .map(|week| {
                week.iter()
                    .map(|c| GLYPHS[usize::from(c.intensity)])
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets() {
        assert_eq!(intensity(0), 0);
        assert_eq!(intensity(29), 1);
        assert_eq!(intensity(30), 2);
        assert_eq!(intensity(59), 2);
        assert_eq!(intensity(60), 3);
        assert_eq!(intensity(119), 3);
        assert_eq!(intensity(120), 4);
    }

    #[test]
    fn covers_requested_window_oldest_first() {
        let today = day(2024, 3, 10);
        let map = BTreeMap::from([(day(2024, 3, 10), 45), (day(2024, 1, 1), 500)]);
        let heatmap = Heatmap::build(&map, today, DEFAULT_DAYS);

        assert_eq!(heatmap.cells.len(), 90);
        assert_eq!(heatmap.cells.last().unwrap().date, today);
        assert_eq!(heatmap.cells.first().unwrap().date, day(2023, 12, 12));
        assert_eq!(heatmap.cells.last().unwrap().intensity, 2);
        assert_eq!(heatmap.active_days(), 2);
    }

    #[test]
    fn days_outside_window_are_ignored() {
        let today = day(2024, 3, 10);
        let map = BTreeMap::from([(day(2024, 3, 3), 30)]);
        let heatmap = Heatmap::build(&map, today, 7);
        assert_eq!(heatmap.active_days(), 0);
    }

    #[test]
    fn weeks_chunk_by_seven() {
        let heatmap = Heatmap::build(&BTreeMap::new(), day(2024, 3, 10), 90);
        let rows: Vec<_> = heatmap.weeks().collect();
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[12].len(), 6);
        assert_eq!(heatmap.render().lines().count(), 13);
    }
}
