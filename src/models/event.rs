use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Decimal,
    pub banner: Option<String>,
    /// Kept in lockstep with the rsvps table inside every RSVP transaction.
    pub attendee_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event row joined with its organizer's display name, as rendered in listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Decimal,
    pub banner: Option<String>,
    pub organizer_name: String,
    pub attendee_count: i32,
}
