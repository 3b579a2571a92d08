use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/session",
            post(handlers::sign_in).delete(handlers::sign_out),
        )
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/api/habits/:id",
            patch(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_today))
        .route("/api/habits/:id/entries/:date", put(handlers::put_entry))
        .route("/api/habits/:id/stats", get(handlers::get_habit_stats))
        .route("/api/entries", get(handlers::list_entries))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/calendar/:date", get(handlers::get_day))
        .with_state(state)
}
