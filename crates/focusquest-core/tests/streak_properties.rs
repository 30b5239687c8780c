//! Property tests for the daily streak rule.

use chrono::{Duration, NaiveDate};
use focusquest_core::Stats;
use proptest::prelude::*;

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn streak_follows_calendar_day_difference(
        streak in 0u32..500,
        gap in 0i64..400,
        minutes in 1u32..240,
    ) {
        let last = base_day();
        let today = last + Duration::days(gap);
        let mut stats = Stats {
            streak,
            last_active_date: Some(last),
            ..Stats::default()
        };
        stats.add_activity(minutes, today);

        prop_assert_eq!(stats.last_active_date, Some(today));
        match gap {
            0 => prop_assert_eq!(stats.streak, streak),
            1 => prop_assert_eq!(stats.streak, streak + 1),
            _ => prop_assert_eq!(stats.streak, 1),
        }
    }

    #[test]
    fn update_streak_is_idempotent_within_a_day(streak in 0u32..500, gap in -30i64..30) {
        let today = base_day();
        let mut once = Stats {
            streak,
            last_active_date: Some(today - Duration::days(gap)),
            ..Stats::default()
        };
        once.update_streak(today);
        let mut twice = once.clone();
        twice.update_streak(today);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clock_skew_restarts_the_streak(streak in 0u32..500, ahead in 1i64..365) {
        let today = base_day();
        let mut stats = Stats {
            streak,
            last_active_date: Some(today + Duration::days(ahead)),
            ..Stats::default()
        };
        stats.update_streak(today);
        prop_assert_eq!(stats.streak, 1);
    }

    #[test]
    fn same_day_activity_is_idempotent_for_streak(
        sessions in proptest::collection::vec(1u32..120, 1..20),
    ) {
        let today = base_day();
        let mut stats = Stats::default();
        for minutes in &sessions {
            stats.add_activity(*minutes, today);
        }
        let total: u32 = sessions.iter().sum();

        prop_assert_eq!(stats.streak, 1);
        prop_assert_eq!(stats.total_sessions, sessions.len() as u64);
        prop_assert_eq!(stats.total_minutes, u64::from(total));
        prop_assert_eq!(stats.minutes_on(today), total);
    }

    #[test]
    fn consecutive_days_build_the_streak(days in 1u32..60) {
        let mut stats = Stats::default();
        for offset in 0..days {
            stats.add_activity(25, base_day() + Duration::days(i64::from(offset)));
        }
        prop_assert_eq!(stats.streak, days);
        prop_assert_eq!(stats.activity_map.len(), days as usize);
    }
}

#[test]
fn chat_queries_count_toward_streak_but_not_minutes() {
    let today = base_day();
    let mut stats = Stats {
        streak: 4,
        last_active_date: Some(today - Duration::days(1)),
        ..Stats::default()
    };
    stats.record_chat_query(today);

    assert_eq!(stats.streak, 5);
    assert_eq!(stats.ai_queries, 1);
    assert_eq!(stats.total_minutes, 0);
    assert_eq!(stats.minutes_on(today), 0);
}
