use crate::backend::HabitBackend;
use crate::config::AppConfig;
use crate::session::HabitSession;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn HabitBackend>,
    // Held across each backend round-trip.
    pub session: Arc<Mutex<Option<HabitSession>>>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn HabitBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            session: Arc::new(Mutex::new(None)),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.config.day_boundary.today()
    }
}
