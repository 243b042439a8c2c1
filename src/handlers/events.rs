use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::event::{Event, EventSummary};
use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

const EVENT_SUMMARY_QUERY: &str = "SELECT e.id, e.title, e.description, e.date, e.location, \
     e.price, e.banner, u.name AS organizer_name, e.attendee_count \
     FROM events e JOIN users u ON u.id = e.organizer_id";

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Option<Decimal>,
    pub banner: Option<String>,
}

impl CreateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.location.trim().is_empty()
        {
            return Err(AppError::ValidationError(
                "Title, description, date and location are required".to_string(),
            ));
        }
        if self.date <= Utc::now() {
            return Err(AppError::ValidationError(
                "Event date must be in the future".to_string(),
            ));
        }
        if self.price.is_some_and(|price| price.is_sign_negative()) {
            return Err(AppError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub banner: Option<String>,
}

impl UpdateEventRequest {
    fn validate(&self) -> Result<(), AppError> {
        let blank = |field: &Option<String>| {
            field.as_deref().is_some_and(|value| value.trim().is_empty())
        };
        if blank(&self.title) || blank(&self.description) || blank(&self.location) {
            return Err(AppError::ValidationError(
                "Updated fields cannot be empty".to_string(),
            ));
        }
        if self.price.is_some_and(|price| price.is_sign_negative()) {
            return Err(AppError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared lookup used by every handler that starts from an event id.
pub(crate) async fn event_by_id(pool: &PgPool, event_id: Uuid) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", event_id)))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = sqlx::query_as::<_, EventSummary>(&format!(
        "{EVENT_SUMMARY_QUERY} ORDER BY e.date ASC"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(success(events, "Events fetched successfully").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = sqlx::query_as::<_, EventSummary>(&format!(
        "{EVENT_SUMMARY_QUERY} WHERE e.id = $1"
    ))
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", event_id)))?;

    Ok(success(event, "Event fetched successfully").into_response())
}

pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    if auth.role != Role::Organizer {
        return Err(AppError::Forbidden(
            "Only organizers can create events".to_string(),
        ));
    }
    req.validate()?;

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (id, organizer_id, title, description, date, location, price, banner) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.id)
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(req.date)
    .bind(req.location.trim())
    .bind(req.price.unwrap_or(Decimal::ZERO))
    .bind(&req.banner)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(event_id = %event.id, organizer_id = %auth.id, "Event created");

    Ok(created(event, "Event created successfully").into_response())
}

pub async fn update_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    req.validate()?;

    let event = event_by_id(&state.pool, event_id).await?;
    if event.organizer_id != auth.id {
        return Err(AppError::Forbidden(
            "Only the organizer can update this event".to_string(),
        ));
    }

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET title = COALESCE($2, title), \
         description = COALESCE($3, description), date = COALESCE($4, date), \
         location = COALESCE($5, location), price = COALESCE($6, price), \
         banner = COALESCE($7, banner), updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(event_id)
    .bind(req.title.as_deref().map(str::trim))
    .bind(req.description.as_deref().map(str::trim))
    .bind(req.date)
    .bind(req.location.as_deref().map(str::trim))
    .bind(req.price)
    .bind(&req.banner)
    .fetch_one(&state.pool)
    .await?;

    Ok(success(event, "Event updated successfully").into_response())
}

pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = event_by_id(&state.pool, event_id).await?;
    if event.organizer_id != auth.id {
        return Err(AppError::Forbidden(
            "Only the organizer can delete this event".to_string(),
        ));
    }

    // RSVPs and comments go with it (ON DELETE CASCADE).
    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(&state.pool)
        .await?;

    tracing::info!(event_id = %event_id, organizer_id = %auth.id, "Event deleted");

    Ok(empty_success("Event deleted successfully").into_response())
}
