use crate::errors::BackendError;
use crate::models::{EntryUpsert, Habit, HabitChanges, HabitEntry, NewHabit, StoreData, User};
use crate::storage::{load_data, persist_data};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

#[async_trait]
pub trait HabitBackend: Send + Sync {
    async fn sign_in(&self, email: &str) -> Result<User, BackendError>;

    async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>, BackendError>;

    async fn list_entries(
        &self,
        habit_ids: &[String],
        since: &str,
    ) -> Result<Vec<HabitEntry>, BackendError>;

    async fn create_habit(&self, user_id: &str, habit: NewHabit) -> Result<Habit, BackendError>;

    async fn update_habit(
        &self,
        habit_id: &str,
        changes: HabitChanges,
    ) -> Result<Habit, BackendError>;

    async fn delete_habit(&self, habit_id: &str) -> Result<(), BackendError>;

    async fn upsert_entry(&self, upsert: EntryUpsert) -> Result<HabitEntry, BackendError>;
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct JsonFileBackend {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf, data: StoreData) -> Self {
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub async fn open(path: &Path) -> Self {
        let data = load_data(path).await;
        Self::new(path.to_path_buf(), data)
    }

    async fn commit<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let out = change(&mut next)?;
        persist_data(&self.path, &next).await?;
        *data = next;
        Ok(out)
    }
}

#[async_trait]
impl HabitBackend for JsonFileBackend {
    async fn sign_in(&self, email: &str) -> Result<User, BackendError> {
        let email = email.trim().to_lowercase();
        if let Some(user) = self.data.lock().await.users.iter().find(|u| u.email == email) {
            return Ok(user.clone());
        }

        self.commit(|data| {
            // Another sign-in may have registered the user meanwhile.
            if let Some(user) = data.users.iter().find(|u| u.email == email) {
                return Ok(user.clone());
            }
            let user = User {
                id: Uuid::new_v4().to_string(),
                email,
                created_at: timestamp(),
            };
            data.users.push(user.clone());
            Ok(user)
        })
        .await
    }

    async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>, BackendError> {
        let data = self.data.lock().await;
        let mut habits: Vec<Habit> = data
            .habits
            .iter()
            .filter(|habit| habit.user_id == user_id)
            .cloned()
            .collect();
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(habits)
    }

    async fn list_entries(
        &self,
        habit_ids: &[String],
        since: &str,
    ) -> Result<Vec<HabitEntry>, BackendError> {
        let data = self.data.lock().await;
        let mut entries: Vec<HabitEntry> = data
            .entries
            .iter()
            .filter(|entry| habit_ids.contains(&entry.habit_id) && entry.date.as_str() >= since)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn create_habit(&self, user_id: &str, habit: NewHabit) -> Result<Habit, BackendError> {
        let user_id = user_id.to_string();
        self.commit(|data| {
            if !data.users.iter().any(|user| user.id == user_id) {
                return Err(BackendError::UserNotFound(user_id));
            }
            let now = timestamp();
            let created = Habit {
                id: Uuid::new_v4().to_string(),
                user_id,
                title: habit.title,
                description: habit.description,
                color: habit.color.unwrap_or_default(),
                category: habit.category.unwrap_or_default(),
                created_at: now.clone(),
                updated_at: now,
            };
            data.habits.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn update_habit(
        &self,
        habit_id: &str,
        changes: HabitChanges,
    ) -> Result<Habit, BackendError> {
        self.commit(|data| {
            let habit = data
                .habits
                .iter_mut()
                .find(|habit| habit.id == habit_id)
                .ok_or_else(|| BackendError::HabitNotFound(habit_id.to_string()))?;
            if let Some(title) = changes.title {
                habit.title = title;
            }
            if let Some(description) = changes.description {
                habit.description = Some(description).filter(|d| !d.is_empty());
            }
            if let Some(color) = changes.color {
                habit.color = color;
            }
            if let Some(category) = changes.category {
                habit.category = category;
            }
            habit.updated_at = timestamp();
            Ok(habit.clone())
        })
        .await
    }

    async fn delete_habit(&self, habit_id: &str) -> Result<(), BackendError> {
        self.commit(|data| {
            let before = data.habits.len();
            data.habits.retain(|habit| habit.id != habit_id);
            if data.habits.len() == before {
                return Err(BackendError::HabitNotFound(habit_id.to_string()));
            }
            data.entries.retain(|entry| entry.habit_id != habit_id);
            Ok(())
        })
        .await
    }

    async fn upsert_entry(&self, upsert: EntryUpsert) -> Result<HabitEntry, BackendError> {
        self.commit(|data| {
            if !data.habits.iter().any(|habit| habit.id == upsert.habit_id) {
                return Err(BackendError::HabitNotFound(upsert.habit_id));
            }
            let existing = data
                .entries
                .iter_mut()
                .find(|entry| entry.habit_id == upsert.habit_id && entry.date == upsert.date);
            if let Some(entry) = existing {
                if let Some(completed) = upsert.completed {
                    entry.completed = completed;
                }
                if let Some(note) = upsert.note {
                    entry.note = note;
                }
                return Ok(entry.clone());
            }

            let entry = HabitEntry {
                id: Uuid::new_v4().to_string(),
                habit_id: upsert.habit_id,
                date: upsert.date,
                completed: upsert.completed.unwrap_or(false),
                note: upsert.note.flatten(),
                created_at: timestamp(),
            };
            data.entries.push(entry.clone());
            Ok(entry)
        })
        .await
    }
}
