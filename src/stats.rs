use crate::dates::{WeekdayLocale, date_to_key, key_date};
use crate::models::{
    BestStreak, DailyPoint, Habit, HabitEntry, HabitStats, HabitStatsResponse, HabitWithEntry,
    StatsResponse, TodaySummary,
};
use crate::streak::{best_streak, current_streak};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

pub fn build_stats_at<H: AsRef<Habit>>(
    today: NaiveDate,
    locale: WeekdayLocale,
    habits: &[H],
    entries: &[HabitEntry],
) -> StatsResponse {
    let per_habit = habits
        .iter()
        .map(|habit| habit_stats_response(habit.as_ref(), entries, today))
        .collect();

    StatsResponse {
        overall_completion_rate: overall_completion_rate(habits, entries),
        best_streak: best_streak_ever(habits, entries),
        weekly_average: weekly_average(habits, entries),
        active_days: active_days(entries),
        last_7_days: last_7_days(today, locale, habits, entries),
        habits: per_habit,
    }
}

pub fn habit_stats_response(
    habit: &Habit,
    entries: &[HabitEntry],
    today: NaiveDate,
) -> HabitStatsResponse {
    HabitStatsResponse {
        habit_id: habit.id.clone(),
        title: habit.title.clone(),
        first_tracked: first_tracking_date(&habit.id, entries),
        stats: habit_stats(&habit.id, entries, today),
    }
}

pub fn completed_dates(habit_id: &str, entries: &[HabitEntry]) -> Vec<NaiveDate> {
    entries
        .iter()
        .filter(|entry| entry.habit_id == habit_id && entry.completed)
        .filter_map(|entry| key_date(&entry.date))
        .collect()
}

pub fn habit_stats(habit_id: &str, entries: &[HabitEntry], today: NaiveDate) -> HabitStats {
    let own: Vec<&HabitEntry> = entries
        .iter()
        .filter(|entry| entry.habit_id == habit_id)
        .collect();

    let total_completed = own.iter().filter(|entry| entry.completed).count() as u32;
    let total_days = own
        .iter()
        .map(|entry| entry.date.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u32;

    let dates = completed_dates(habit_id, entries);

    HabitStats {
        completion_rate: percent(total_completed as usize, total_days as usize),
        current_streak: current_streak(&dates, today),
        best_streak: best_streak(&dates),
        total_completed,
        total_days,
    }
}

pub fn first_tracking_date(habit_id: &str, entries: &[HabitEntry]) -> Option<String> {
    entries
        .iter()
        .filter(|entry| entry.habit_id == habit_id)
        .map(|entry| entry.date.as_str())
        .min()
        .map(str::to_string)
}

/// Completed entries against every habit on every date that appears in `entries`.
pub fn overall_completion_rate<H: AsRef<Habit>>(habits: &[H], entries: &[HabitEntry]) -> u32 {
    if habits.is_empty() {
        return 0;
    }
    let completed = entries.iter().filter(|entry| entry.completed).count();
    let distinct_dates = entries
        .iter()
        .map(|entry| entry.date.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    percent(completed, habits.len() * distinct_dates)
}

/// Highest best-ever streak across habits. Ties go to the earlier habit.
pub fn best_streak_ever<H: AsRef<Habit>>(habits: &[H], entries: &[HabitEntry]) -> BestStreak {
    let mut best = BestStreak {
        streak: 0,
        habit_id: None,
        habit_title: String::new(),
    };

    for habit in habits {
        let habit: &Habit = habit.as_ref();
        let streak = best_streak(&completed_dates(&habit.id, entries));
        if streak > best.streak {
            best = BestStreak {
                streak,
                habit_id: Some(habit.id.clone()),
                habit_title: habit.title.clone(),
            };
        }
    }

    best
}

/// Completions per week between the first and last completion, one decimal.
pub fn weekly_average<H: AsRef<Habit>>(habits: &[H], entries: &[HabitEntry]) -> f64 {
    if habits.is_empty() {
        return 0.0;
    }
    let dates: Vec<NaiveDate> = entries
        .iter()
        .filter(|entry| entry.completed)
        .filter_map(|entry| key_date(&entry.date))
        .collect();
    let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };

    let span_days = (*max - *min).num_days();
    let weeks = ((span_days + 6) / 7).max(1);

    let average = dates.len() as f64 / weeks as f64;
    (average * 10.0).round() / 10.0
}

pub fn active_days(entries: &[HabitEntry]) -> u32 {
    entries
        .iter()
        .filter(|entry| entry.completed)
        .map(|entry| entry.date.as_str())
        .collect::<BTreeSet<_>>()
        .len() as u32
}

pub fn day_percentage<H: AsRef<Habit>>(date: &str, habits: &[H], entries: &[HabitEntry]) -> u32 {
    let completed = entries
        .iter()
        .filter(|entry| entry.completed && entry.date == date)
        .count();
    percent(completed, habits.len())
}

/// The seven days ending at `today`, oldest first.
pub fn last_7_days<H: AsRef<Habit>>(
    today: NaiveDate,
    locale: WeekdayLocale,
    habits: &[H],
    entries: &[HabitEntry],
) -> Vec<DailyPoint> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let key = date_to_key(date);
            DailyPoint {
                percentage: day_percentage(&key, habits, entries),
                day_name: locale.short_label(date.weekday()).to_string(),
                date: key,
            }
        })
        .collect()
}

pub fn today_summary(habits: &[HabitWithEntry]) -> TodaySummary {
    let total = habits.len();
    let completed = habits
        .iter()
        .filter(|habit| habit.today_entry.as_ref().is_some_and(|entry| entry.completed))
        .count();

    TodaySummary {
        total: total as u32,
        completed: completed as u32,
        percentage: percent(completed, total),
    }
}

pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(id: &str, title: &str) -> Habit {
        Habit {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            description: None,
            color: "#6366f1".to_string(),
            category: "Other".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn entry(habit_id: &str, date: &str, completed: bool) -> HabitEntry {
        HabitEntry {
            id: format!("{habit_id}-{date}"),
            habit_id: habit_id.to_string(),
            date: date.to_string(),
            completed,
            note: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn habit_stats_counts_tracked_days_only() {
        let today = day(2024, 1, 10);
        let entries = vec![
            entry("h1", "2024-01-08", true),
            entry("h1", "2024-01-09", false),
            entry("h1", "2024-01-10", true),
            entry("h2", "2024-01-10", true),
        ];

        let stats = habit_stats("h1", &entries, today);
        assert_eq!(stats.total_completed, 2);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.completion_rate, 67);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 1);
    }

    #[test]
    fn habit_without_entries_has_zero_rate() {
        assert_eq!(habit_stats("h1", &[], day(2024, 1, 1)), HabitStats::default());
        assert_eq!(first_tracking_date("h1", &[]), None);
    }

    #[test]
    fn three_day_run_ending_today() {
        let today = day(2024, 5, 3);
        let entries = vec![
            entry("h1", "2024-05-01", true),
            entry("h1", "2024-05-02", true),
            entry("h1", "2024-05-03", true),
        ];
        let stats = habit_stats("h1", &entries, today);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(first_tracking_date("h1", &entries).as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn overall_rate_spreads_dates_across_habits() {
        let habits = vec![habit("h1", "Read"), habit("h2", "Run")];
        let entries = vec![
            entry("h1", "2024-01-01", true),
            entry("h1", "2024-01-02", true),
            entry("h2", "2024-01-02", false),
        ];
        // 2 completions over 2 habits x 2 dates.
        assert_eq!(overall_completion_rate(&habits, &entries), 50);
        assert_eq!(overall_completion_rate::<Habit>(&[], &entries), 0);
        assert_eq!(overall_completion_rate(&habits, &[]), 0);
    }

    #[test]
    fn best_streak_is_attributed_to_the_completing_habit() {
        let habits = vec![habit("h1", "Read"), habit("h2", "Run")];
        let entries = vec![
            entry("h1", "2024-01-01", false),
            entry("h2", "2024-01-01", true),
            entry("h2", "2024-01-02", true),
        ];
        let best = best_streak_ever(&habits, &entries);
        assert_eq!(best.streak, 2);
        assert_eq!(best.habit_id.as_deref(), Some("h2"));
        assert_eq!(best.habit_title, "Run");
    }

    #[test]
    fn best_streak_tie_goes_to_first_habit() {
        let habits = vec![habit("h1", "Read"), habit("h2", "Run")];
        let entries = vec![entry("h2", "2024-01-01", true), entry("h1", "2024-01-05", true)];
        assert_eq!(best_streak_ever(&habits, &entries).habit_id.as_deref(), Some("h1"));

        let none = best_streak_ever::<Habit>(&[], &entries);
        assert_eq!(none.streak, 0);
        assert_eq!(none.habit_id, None);
    }

    #[test]
    fn weekly_average_uses_completion_span() {
        let habits = vec![habit("h1", "Read")];
        let entries = vec![
            entry("h1", "2024-01-01", true),
            entry("h1", "2024-01-02", true),
            entry("h1", "2024-01-15", true),
            entry("h1", "2024-01-20", false),
        ];
        // 14 days apart -> 2 weeks.
        assert_eq!(weekly_average(&habits, &entries), 1.5);

        let single_day = vec![entry("h1", "2024-01-01", true)];
        assert_eq!(weekly_average(&habits, &single_day), 1.0);

        let eight_days = vec![
            entry("h1", "2024-01-01", true),
            entry("h1", "2024-01-02", true),
            entry("h1", "2024-01-09", true),
        ];
        // 8 days apart rounds up to 2 weeks.
        assert_eq!(weekly_average(&habits, &eight_days), 1.5);

        assert_eq!(weekly_average(&habits, &[entry("h1", "2024-01-01", false)]), 0.0);
    }

    #[test]
    fn active_days_counts_distinct_completed_dates() {
        let entries = vec![
            entry("h1", "2024-01-01", true),
            entry("h2", "2024-01-01", true),
            entry("h1", "2024-01-02", false),
            entry("h2", "2024-01-03", true),
        ];
        assert_eq!(active_days(&entries), 2);
    }

    #[test]
    fn last_7_days_always_has_seven_points() {
        let today = day(2024, 1, 7);
        let empty = last_7_days::<Habit>(today, WeekdayLocale::En, &[], &[]);
        assert_eq!(empty.len(), 7);
        assert!(empty.iter().all(|point| point.percentage == 0));
        assert_eq!(empty.first().unwrap().date, "2024-01-01");
        assert_eq!(empty.last().unwrap().date, "2024-01-07");
        assert_eq!(empty.last().unwrap().day_name, "Sun");

        let habits = vec![habit("h1", "Read"), habit("h2", "Run")];
        let entries = vec![
            entry("h1", "2024-01-06", true),
            entry("h2", "2024-01-06", false),
            entry("h1", "2024-01-07", true),
            entry("h2", "2024-01-07", true),
        ];
        let series = last_7_days(today, WeekdayLocale::Hr, &habits, &entries);
        assert_eq!(series.len(), 7);
        assert_eq!(series[5].percentage, 50);
        assert_eq!(series[6].percentage, 100);
        assert_eq!(series[6].day_name, "Ned");
    }

    #[test]
    fn build_stats_with_no_habits_is_all_zero() {
        let stats = build_stats_at::<Habit>(day(2024, 1, 7), WeekdayLocale::En, &[], &[]);
        assert_eq!(stats.overall_completion_rate, 0);
        assert_eq!(stats.best_streak.habit_id, None);
        assert_eq!(stats.weekly_average, 0.0);
        assert_eq!(stats.active_days, 0);
        assert_eq!(stats.last_7_days.len(), 7);
        assert!(stats.habits.is_empty());
    }

    #[test]
    fn today_summary_counts_completed_today_entries() {
        let with = |id: &str, completed: Option<bool>| HabitWithEntry {
            habit: habit(id, id),
            today_entry: completed.map(|done| entry(id, "2024-01-07", done)),
            streak: 0,
        };
        let habits = vec![with("a", Some(true)), with("b", Some(false)), with("c", None)];
        let summary = today_summary(&habits);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.percentage, 33);
        assert_eq!(today_summary(&[]).percentage, 0);
    }
}
