use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::rsvp::PaymentStatus;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct RsvpRequest {
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpState {
    Rsvpd,
    NotRsvpd,
}

#[derive(Debug, Serialize)]
pub struct RsvpStatusPayload {
    pub rsvp_status: RsvpState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

/// Creates the RSVP row and bumps the event's attendee count in one
/// transaction. The event row is locked first so two concurrent RSVPs for the
/// same event cannot lose an increment, and the (user_id, event_id) unique
/// constraint turns a duplicate into `Conflict` instead of a double insert.
pub async fn create_rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RsvpRequest>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;

    let price = sqlx::query_scalar::<_, Decimal>(
        "SELECT price FROM events WHERE id = $1 FOR UPDATE",
    )
    .bind(req.event_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Event with id '{}' was not found", req.event_id))
    })?;

    let payment_status = PaymentStatus::for_price(price);

    sqlx::query("INSERT INTO rsvps (id, user_id, event_id, payment_status) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(auth.id)
        .bind(req.event_id)
        .bind(payment_status)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_or_db(e, "Already RSVP'd to this event"))?;

    sqlx::query("UPDATE events SET attendee_count = attendee_count + 1, updated_at = now() WHERE id = $1")
        .bind(req.event_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %auth.id, event_id = %req.event_id, status = ?payment_status, "RSVP created");

    let payload = RsvpStatusPayload {
        rsvp_status: RsvpState::Rsvpd,
        payment_status: Some(payment_status),
    };
    Ok(created(payload, "RSVP created successfully").into_response())
}

/// Deletes the RSVP row and drops the attendee count in the same transaction,
/// mirroring `create_rsvp`.
pub async fn cancel_rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut tx = state.pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM rsvps WHERE user_id = $1 AND event_id = $2")
        .bind(auth.id)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("RSVP not found".to_string()));
    }

    sqlx::query("UPDATE events SET attendee_count = attendee_count - 1, updated_at = now() WHERE id = $1")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(user_id = %auth.id, event_id = %event_id, "RSVP cancelled");

    Ok(empty_success("RSVP cancelled successfully").into_response())
}

pub async fn rsvp_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let payment_status = sqlx::query_scalar::<_, PaymentStatus>(
        "SELECT payment_status FROM rsvps WHERE user_id = $1 AND event_id = $2",
    )
    .bind(auth.id)
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?;

    let payload = match payment_status {
        Some(payment_status) => RsvpStatusPayload {
            rsvp_status: RsvpState::Rsvpd,
            payment_status: Some(payment_status),
        },
        None => RsvpStatusPayload {
            rsvp_status: RsvpState::NotRsvpd,
            payment_status: None,
        },
    };

    Ok(success(payload, "RSVP status fetched successfully").into_response())
}
