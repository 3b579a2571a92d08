use crate::dates::{YearMonth, date_to_key, days_in_month, first_weekday_offset};
use crate::models::{Habit, HabitEntry};
use crate::stats::{day_percentage, percent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: String,
    pub percentage: u32,
    pub has_note: bool,
    pub is_today: bool,
    pub is_future: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthHeatmap {
    #[serde(flatten)]
    pub month: YearMonth,
    pub leading_blanks: u32,
    pub days: Vec<HeatmapCell>,
    pub previous: Option<YearMonth>,
    pub next: Option<YearMonth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHabit {
    pub habit_id: String,
    pub title: String,
    pub color: String,
    pub completed: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDetail {
    pub date: String,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
    pub habits: Vec<DayHabit>,
}

pub fn month_heatmap<H: AsRef<Habit>>(
    month: YearMonth,
    today: NaiveDate,
    habits: &[H],
    entries: &[HabitEntry],
) -> MonthHeatmap {
    let days = days_in_month(month.year, month.month)
        .into_iter()
        .map(|date| {
            let key = date_to_key(date);
            HeatmapCell {
                percentage: day_percentage(&key, habits, entries),
                has_note: entries.iter().any(|entry| {
                    entry.date == key
                        && entry.note.as_deref().is_some_and(|note| !note.trim().is_empty())
                }),
                is_today: date == today,
                is_future: date > today,
                date: key,
            }
        })
        .collect();

    MonthHeatmap {
        month,
        leading_blanks: first_weekday_offset(month.year, month.month),
        days,
        previous: month.previous(),
        next: month.next(),
    }
}

pub fn day_detail<H: AsRef<Habit>>(date: &str, habits: &[H], entries: &[HabitEntry]) -> DayDetail {
    let rows: Vec<DayHabit> = habits
        .iter()
        .map(|habit| {
            let habit: &Habit = habit.as_ref();
            let entry = entries
                .iter()
                .find(|entry| entry.habit_id == habit.id && entry.date == date);
            DayHabit {
                habit_id: habit.id.clone(),
                title: habit.title.clone(),
                color: habit.color.clone(),
                completed: entry.is_some_and(|entry| entry.completed),
                note: entry.and_then(|entry| entry.note.clone()),
            }
        })
        .collect();

    let completed = rows.iter().filter(|row| row.completed).count();

    DayDetail {
        date: date.to_string(),
        completed: completed as u32,
        total: rows.len() as u32,
        percentage: percent(completed, rows.len()),
        habits: rows,
    }
}
