use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, comments, events, health_check, organizer, rsvps};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/rsvp", post(rsvps::create_rsvp))
        .route(
            "/api/rsvp/:event_id",
            get(rsvps::rsvp_status).delete(rsvps::cancel_rsvp),
        )
        .route(
            "/api/events/:event_id/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/api/comments/:comment_id", delete(comments::delete_comment))
        .route("/api/organizer/events", get(organizer::organizer_events))
        .route(
            "/api/organizer/events/:event_id/rsvps",
            get(organizer::event_rsvps),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
