use crate::backend::HabitBackend;
use crate::calendar::{DayDetail, MonthHeatmap, day_detail, month_heatmap};
use crate::dates::{
    WeekdayLocale, YearMonth, date_to_key, is_future_key, is_same_day, offset_days, parse_key,
};
use crate::errors::HabitError;
use crate::models::{
    DEFAULT_CATEGORY, DEFAULT_COLOR, EntryUpsert, HabitChanges, HabitEntry, HabitStatsResponse,
    HabitWithEntry, MAX_NOTE_CHARS, NewHabit, StatsResponse, TodaySummary, User,
};
use crate::stats::{build_stats_at, completed_dates, habit_stats_response, today_summary};
use crate::streak::current_streak;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct HabitSession {
    user: User,
    today: NaiveDate,
    habits: Vec<HabitWithEntry>,
    entries: Vec<HabitEntry>,
}

pub fn active(slot: &mut Option<HabitSession>) -> Result<&mut HabitSession, HabitError> {
    slot.as_mut().ok_or(HabitError::NotAuthenticated)
}

impl HabitSession {
    pub async fn load(
        backend: &dyn HabitBackend,
        user: User,
        today: NaiveDate,
        history_days: i64,
    ) -> Result<Self, HabitError> {
        let habits = backend.list_habits(&user.id).await?;
        let habit_ids: Vec<String> = habits.iter().map(|habit| habit.id.clone()).collect();
        // A window reaching past the calendar's start loads everything.
        let since = offset_days(&date_to_key(today), history_days).unwrap_or_default();
        let entries = backend.list_entries(&habit_ids, &since).await?;

        debug!(
            user = %user.id,
            habits = habits.len(),
            entries = entries.len(),
            "session loaded"
        );

        let mut session = Self {
            user,
            today,
            habits: habits
                .into_iter()
                .map(|habit| HabitWithEntry {
                    habit,
                    today_entry: None,
                    streak: 0,
                })
                .collect(),
            entries,
        };
        session.refresh_derived();
        Ok(session)
    }

    pub async fn sign_in(
        backend: &dyn HabitBackend,
        email: &str,
        today: NaiveDate,
        history_days: i64,
    ) -> Result<Self, HabitError> {
        if email.trim().is_empty() {
            return Err(HabitError::invalid("email", "must not be empty"));
        }
        let user = backend.sign_in(email).await?;
        info!(user = %user.id, "signed in");
        Self::load(backend, user, today, history_days).await
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn habits(&self) -> &[HabitWithEntry] {
        &self.habits
    }

    pub fn entries(&self) -> &[HabitEntry] {
        &self.entries
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today != today {
            self.today = today;
            self.refresh_derived();
        }
    }

    pub fn habit(&self, habit_id: &str) -> Result<&HabitWithEntry, HabitError> {
        self.habits
            .iter()
            .find(|habit| habit.habit.id == habit_id)
            .ok_or_else(|| HabitError::not_found(habit_id))
    }

    pub fn entry(&self, habit_id: &str, date: &str) -> Option<&HabitEntry> {
        self.entries
            .iter()
            .find(|entry| entry.habit_id == habit_id && entry.date == date)
    }

    pub async fn create_habit(
        &mut self,
        backend: &dyn HabitBackend,
        new: NewHabit,
    ) -> Result<HabitWithEntry, HabitError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(HabitError::invalid("title", "must not be empty"));
        }
        let request = NewHabit {
            title: title.to_string(),
            description: non_blank(new.description),
            color: Some(non_blank(new.color).unwrap_or_else(|| DEFAULT_COLOR.to_string())),
            category: Some(non_blank(new.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
        };

        let habit = backend
            .create_habit(&self.user.id, request)
            .await
            .inspect_err(|err| warn!("create habit failed: {err}"))?;
        info!(habit = %habit.id, "habit created");

        let created = HabitWithEntry {
            habit,
            today_entry: None,
            streak: 0,
        };
        self.habits.push(created.clone());
        Ok(created)
    }

    pub async fn update_habit(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
        changes: HabitChanges,
    ) -> Result<HabitWithEntry, HabitError> {
        self.habit(habit_id)?;
        let title = match changes.title {
            Some(title) if title.trim().is_empty() => {
                return Err(HabitError::invalid("title", "must not be empty"));
            }
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };
        let changes = HabitChanges {
            title,
            description: changes.description.map(|d| d.trim().to_string()),
            color: non_blank(changes.color),
            category: non_blank(changes.category),
        };

        let updated = backend
            .update_habit(habit_id, changes)
            .await
            .inspect_err(|err| warn!("update habit {habit_id} failed: {err}"))?;

        let slot = self
            .habits
            .iter_mut()
            .find(|habit| habit.habit.id == habit_id)
            .ok_or_else(|| HabitError::not_found(habit_id))?;
        slot.habit = updated;
        Ok(slot.clone())
    }

    pub async fn delete_habit(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
    ) -> Result<(), HabitError> {
        self.habit(habit_id)?;
        backend
            .delete_habit(habit_id)
            .await
            .inspect_err(|err| warn!("delete habit {habit_id} failed: {err}"))?;
        info!(habit = %habit_id, "habit deleted");

        self.habits.retain(|habit| habit.habit.id != habit_id);
        self.entries.retain(|entry| entry.habit_id != habit_id);
        Ok(())
    }

    pub async fn toggle_today(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
    ) -> Result<HabitEntry, HabitError> {
        let habit = self.habit(habit_id)?;
        let completed = !habit
            .today_entry
            .as_ref()
            .is_some_and(|entry| entry.completed);
        let date = date_to_key(self.today);
        self.set_entry(backend, habit_id, &date, completed).await
    }

    pub async fn set_entry(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
        date: &str,
        completed: bool,
    ) -> Result<HabitEntry, HabitError> {
        self.upsert(backend, habit_id, date, Some(completed), None).await
    }

    /// Blank clears the note; the completed flag is left as stored.
    pub async fn set_note(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
        date: &str,
        note: Option<String>,
    ) -> Result<HabitEntry, HabitError> {
        self.upsert(backend, habit_id, date, None, Some(note)).await
    }

    /// Writes only the given fields; the backend merges them with what it has
    /// stored, which may lie outside the loaded window.
    pub async fn upsert(
        &mut self,
        backend: &dyn HabitBackend,
        habit_id: &str,
        date: &str,
        completed: Option<bool>,
        note: Option<Option<String>>,
    ) -> Result<HabitEntry, HabitError> {
        self.habit(habit_id)?;
        canonical_date(date)?;
        if is_future_key(date, self.today) {
            return Err(HabitError::invalid("date", format!("{date} is in the future")));
        }
        let note = note.map(non_blank);
        if note
            .as_ref()
            .and_then(Option::as_ref)
            .is_some_and(|note| note.chars().count() > MAX_NOTE_CHARS)
        {
            return Err(HabitError::invalid(
                "note",
                format!("longer than {MAX_NOTE_CHARS} characters"),
            ));
        }

        let entry = backend
            .upsert_entry(EntryUpsert {
                habit_id: habit_id.to_string(),
                date: date.to_string(),
                completed,
                note,
            })
            .await
            .inspect_err(|err| warn!("saving entry {habit_id}@{date} failed: {err}"))?;
        debug!(habit = %habit_id, date, completed = entry.completed, "entry saved");

        match self
            .entries
            .iter_mut()
            .find(|existing| existing.habit_id == entry.habit_id && existing.date == entry.date)
        {
            Some(existing) => *existing = entry.clone(),
            None => self.entries.push(entry.clone()),
        }
        self.refresh_derived();
        Ok(entry)
    }

    pub fn categories(&self) -> Vec<String> {
        self.habits
            .iter()
            .map(|habit| habit.habit.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn today_summary(&self) -> TodaySummary {
        today_summary(&self.habits)
    }

    pub fn stats(&self, locale: WeekdayLocale) -> StatsResponse {
        build_stats_at(self.today, locale, &self.habits, &self.entries)
    }

    pub fn habit_stats(&self, habit_id: &str) -> Result<HabitStatsResponse, HabitError> {
        let habit = self.habit(habit_id)?;
        Ok(habit_stats_response(&habit.habit, &self.entries, self.today))
    }

    pub fn month_heatmap(&self, month: YearMonth) -> MonthHeatmap {
        month_heatmap(month, self.today, &self.habits, &self.entries)
    }

    pub fn day_detail(&self, date: &str) -> Result<DayDetail, HabitError> {
        canonical_date(date)?;
        Ok(day_detail(date, &self.habits, &self.entries))
    }

    fn refresh_derived(&mut self) {
        let today = self.today;
        for habit in &mut self.habits {
            let id = &habit.habit.id;
            habit.today_entry = self
                .entries
                .iter()
                .find(|entry| &entry.habit_id == id && is_same_day(&entry.date, today))
                .cloned();
            habit.streak = current_streak(&completed_dates(id, &self.entries), today);
        }
    }
}

fn canonical_date(key: &str) -> Result<NaiveDate, HabitError> {
    parse_key(key)
        .filter(|date| date_to_key(*date) == key)
        .ok_or_else(|| HabitError::invalid("date", format!("{key:?} is not YYYY-MM-DD")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
impl HabitSession {
    pub(crate) fn from_parts(
        user: User,
        today: NaiveDate,
        habits: Vec<crate::models::Habit>,
        entries: Vec<HabitEntry>,
    ) -> Self {
        let mut session = Self {
            user,
            today,
            habits: habits
                .into_iter()
                .map(|habit| HabitWithEntry {
                    habit,
                    today_entry: None,
                    streak: 0,
                })
                .collect(),
            entries,
        };
        session.refresh_derived();
        session
    }
}
