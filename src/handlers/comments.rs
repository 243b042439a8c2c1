use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::handlers::events::event_by_id;
use crate::models::comment::{Comment, CommentView};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

/// Author and owning organizer of a comment, fetched in one join for the
/// deletion rights check.
#[derive(FromRow)]
struct CommentOwnership {
    user_id: Uuid,
    organizer_id: Uuid,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let comments = sqlx::query_as::<_, CommentView>(
        "SELECT c.id, c.content, c.created_at, c.user_id, u.name AS user_name \
         FROM comments c JOIN users u ON u.id = c.user_id \
         WHERE c.event_id = $1 ORDER BY c.created_at DESC",
    )
    .bind(event_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(comments, "Comments fetched successfully").into_response())
}

pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> Result<Response, AppError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::ValidationError(
            "Comment content is required".to_string(),
        ));
    }

    event_by_id(&state.pool, event_id).await?;

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (id, user_id, event_id, content) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(auth.id)
    .bind(event_id)
    .bind(content)
    .fetch_one(&state.pool)
    .await?;

    let user_name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
        .bind(auth.id)
        .fetch_one(&state.pool)
        .await?;

    let view = CommentView {
        id: comment.id,
        content: comment.content,
        created_at: comment.created_at,
        user_id: comment.user_id,
        user_name,
    };
    Ok(created(view, "Comment added successfully").into_response())
}

pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ownership = sqlx::query_as::<_, CommentOwnership>(
        "SELECT c.user_id, e.organizer_id FROM comments c \
         JOIN events e ON e.id = c.event_id WHERE c.id = $1",
    )
    .bind(comment_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Comment with id '{}' was not found", comment_id))
    })?;

    if ownership.user_id != auth.id && ownership.organizer_id != auth.id {
        return Err(AppError::Forbidden(
            "Only the comment author or the event organizer can delete this comment".to_string(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(&state.pool)
        .await?;

    tracing::info!(comment_id = %comment_id, requester_id = %auth.id, "Comment deleted");

    Ok(empty_success("Comment deleted successfully").into_response())
}
