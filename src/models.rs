use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#6366f1";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Health",
    "Productivity",
    "Learning",
    "Fitness",
    "Mindfulness",
    DEFAULT_CATEGORY,
];
pub const MAX_NOTE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitEntry {
    pub id: String,
    pub habit_id: String,
    pub date: String,
    pub completed: bool,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitWithEntry {
    #[serde(flatten)]
    pub habit: Habit,
    pub today_entry: Option<HabitEntry>,
    pub streak: u32,
}

impl AsRef<Habit> for Habit {
    fn as_ref(&self) -> &Habit {
        self
    }
}

impl AsRef<Habit> for HabitWithEntry {
    fn as_ref(&self) -> &Habit {
        &self.habit
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// Fields left as `None` keep their stored value; a new entry starts not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpsert {
    pub habit_id: String,
    pub date: String,
    pub completed: Option<bool>,
    pub note: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub completed: Option<bool>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    pub users: Vec<User>,
    pub habits: Vec<Habit>,
    pub entries: Vec<HabitEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HabitStats {
    pub completion_rate: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_completed: u32,
    pub total_days: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitStatsResponse {
    pub habit_id: String,
    pub title: String,
    pub first_tracked: Option<String>,
    #[serde(flatten)]
    pub stats: HabitStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestStreak {
    pub streak: u32,
    pub habit_id: Option<String>,
    pub habit_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub day_name: String,
    pub percentage: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub overall_completion_rate: u32,
    pub best_streak: BestStreak,
    pub weekly_average: f64,
    pub active_days: u32,
    pub last_7_days: Vec<DailyPoint>,
    pub habits: Vec<HabitStatsResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodaySummary {
    pub total: u32,
    pub completed: u32,
    pub percentage: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub habits: Vec<HabitWithEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    #[serde(flatten)]
    pub summary: TodaySummary,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub in_use: Vec<String>,
    pub suggested: &'static [&'static str],
}
