use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment row joined with its author's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub user_name: String,
}
