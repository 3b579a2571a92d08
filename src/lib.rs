pub mod app;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;

pub use app::router;
pub use backend::{HabitBackend, JsonFileBackend};
pub use config::AppConfig;
pub use session::HabitSession;
pub use state::AppState;
