use crate::calendar::{DayDetail, MonthHeatmap};
use crate::dates::{YearMonth, date_to_key};
use crate::errors::AppError;
use crate::models::{
    CalendarQuery, CategoriesResponse, EntryRequest, HabitChanges, HabitEntry, HabitStatsResponse,
    HabitWithEntry, NewHabit, SUGGESTED_CATEGORIES, SessionResponse, SignInRequest, StatsResponse,
    TodayResponse,
};
use crate::session::{HabitSession, active};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tokio::sync::MutexGuard;
use tracing::info;

async fn current(state: &AppState) -> MutexGuard<'_, Option<HabitSession>> {
    let mut guard = state.session.lock().await;
    if let Some(session) = guard.as_mut() {
        session.set_today(state.today());
    }
    guard
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut guard = state.session.lock().await;
    let session = HabitSession::sign_in(
        state.backend.as_ref(),
        &payload.email,
        state.today(),
        state.config.history_days,
    )
    .await?;

    let response = SessionResponse {
        user: session.user().clone(),
        habits: session.habits().to_vec(),
    };
    *guard = Some(session);
    Ok(Json(response))
}

pub async fn sign_out(State(state): State<AppState>) -> StatusCode {
    if let Some(session) = state.session.lock().await.take() {
        info!(user = %session.user().id, "signed out");
    }
    StatusCode::NO_CONTENT
}

pub async fn list_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<HabitWithEntry>>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(session.habits().to_vec()))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<HabitWithEntry>), AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    let created = session
        .create_habit(state.backend.as_ref(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HabitChanges>,
) -> Result<Json<HabitWithEntry>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    let updated = session
        .update_habit(state.backend.as_ref(), &id, payload)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    session.delete_habit(state.backend.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_today(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitEntry>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    let entry = session.toggle_today(state.backend.as_ref(), &id).await?;
    Ok(Json(entry))
}

pub async fn put_entry(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<HabitEntry>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    if payload.completed.is_none() && payload.note.is_none() {
        return Err(AppError::bad_request("expected completed and/or note"));
    }
    let entry = session
        .upsert(
            state.backend.as_ref(),
            &id,
            &date,
            payload.completed,
            payload.note.map(Some),
        )
        .await?;
    Ok(Json(entry))
}

pub async fn get_habit_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitStatsResponse>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(session.habit_stats(&id)?))
}

pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<HabitEntry>>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(session.entries().to_vec()))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(TodayResponse {
        date: date_to_key(session.today()),
        summary: session.today_summary(),
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(session.stats(state.config.weekday_locale)))
}

pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(CategoriesResponse {
        in_use: session.categories(),
        suggested: &SUGGESTED_CATEGORIES,
    }))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthHeatmap>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;

    let this_month = YearMonth::of(session.today());
    let year = query.year.unwrap_or(this_month.year);
    let month = query.month.unwrap_or(this_month.month);
    let Some(month) = YearMonth::new(year, month) else {
        return Err(AppError::bad_request(format!(
            "no calendar month {year}-{month}: month must be 1-12 and the year within range"
        )));
    };
    Ok(Json(session.month_heatmap(month)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayDetail>, AppError> {
    let mut guard = current(&state).await;
    let session = active(&mut guard)?;
    Ok(Json(session.day_detail(&date)?))
}
