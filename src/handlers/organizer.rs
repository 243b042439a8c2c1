use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::events::event_by_id;
use crate::models::event::Event;
use crate::models::rsvp::EventAttendee;
use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn organizer_events(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if auth.role != Role::Organizer {
        return Err(AppError::Forbidden(
            "Only organizers can access this endpoint".to_string(),
        ));
    }

    let events = sqlx::query_as::<_, Event>(
        "SELECT * FROM events WHERE organizer_id = $1 ORDER BY date ASC",
    )
    .bind(auth.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(events, "Organizer events fetched successfully").into_response())
}

pub async fn event_rsvps(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = event_by_id(&state.pool, event_id).await?;
    if event.organizer_id != auth.id {
        return Err(AppError::Forbidden(
            "Only the organizer can view RSVPs for this event".to_string(),
        ));
    }

    let attendees = sqlx::query_as::<_, EventAttendee>(
        "SELECT r.id, u.name AS user_name, u.email AS user_email, \
         r.payment_status, r.created_at \
         FROM rsvps r JOIN users u ON u.id = r.user_id \
         WHERE r.event_id = $1 ORDER BY r.created_at ASC",
    )
    .bind(event_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(attendees, "Event RSVPs fetched successfully").into_response())
}
