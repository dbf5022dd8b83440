// src/routes.rs

use axum::{
    Router,
    handler::Handler,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{announcement, health},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, instructor_middleware},
};

/// Assembles the main application router.
///
/// * Public: health probe.
/// * Authenticated: reading announcements.
/// * Instructor+: posting. Admin: deleting.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Auth on the whole group; role checks on individual handlers.
    let announcement_routes = Router::new()
        .route(
            "/",
            get(announcement::list_announcements).post(
                announcement::create_announcement
                    .layer(middleware::from_fn(instructor_middleware)),
            ),
        )
        .route(
            "/{id}",
            get(announcement::get_announcement).delete(
                announcement::delete_announcement.layer(middleware::from_fn(admin_middleware)),
            ),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/announcements", announcement_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
