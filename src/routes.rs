// routes.rs - HTTP surface: every route under /v1 except /health

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/health", get(public::health::get))
        .route("/v1/users", post(public::register::post))
        // Protected
        .merge(user_routes())
        .merge(baby_routes())
        .merge(care_routes())
        .merge(reminder_routes())
        .merge(forum_routes())
        .merge(journal_routes())
        .merge(document_routes())
        .merge(export_routes())
        .merge(lookup_routes())
        .merge(provider_routes())
        // Global middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes));

    let router = match cors_layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route(
            "/v1/users/me",
            get(users::me_get).put(users::me_put).delete(users::me_delete),
        )
        .route(
            "/v1/users/me/profile-image",
            get(users::profile_image_get).put(users::profile_image_put),
        )
        .route("/v1/doctors", get(users::doctors_list))
}

fn baby_routes() -> Router<AppState> {
    use protected::babies;

    Router::new()
        .route("/v1/baby", get(babies::list).post(babies::create))
        .route(
            "/v1/baby/:babyId",
            get(babies::get).put(babies::update).delete(babies::delete),
        )
}

fn care_routes() -> Router<AppState> {
    use protected::{feeding, growth, milestones, stool};

    Router::new()
        // Feeding schedules
        .route(
            "/v1/baby/:babyId/feeding-schedules",
            get(feeding::list).post(feeding::create),
        )
        .route(
            "/v1/baby/:babyId/feeding-schedules/:feedingScheduleId",
            put(feeding::update).delete(feeding::delete),
        )
        // Growth
        .route("/v1/baby/:babyId/growth", get(growth::list).post(growth::create))
        .route(
            "/v1/baby/:babyId/growth/:growthId",
            put(growth::update).delete(growth::delete),
        )
        // Milestones
        .route(
            "/v1/baby/:babyId/milestones",
            get(milestones::list).post(milestones::create),
        )
        .route(
            "/v1/baby/:babyId/milestones/:milestoneId",
            put(milestones::update).delete(milestones::delete),
        )
        // Stool
        .route("/v1/baby/:babyId/stool", get(stool::list).post(stool::create))
        .route(
            "/v1/baby/:babyId/stool/:stoolId",
            put(stool::update).delete(stool::delete),
        )
}

fn reminder_routes() -> Router<AppState> {
    use protected::reminders;

    Router::new()
        .route(
            "/v1/baby/:babyId/reminders",
            get(reminders::list)
                .post(reminders::create)
                .delete(reminders::bulk_delete),
        )
        .route("/v1/baby/:babyId/reminders/:reminderId", put(reminders::update))
        .route("/v1/reminders/upcoming", get(reminders::upcoming))
}

fn forum_routes() -> Router<AppState> {
    use protected::forum;

    Router::new()
        .route("/v1/forum/posts", get(forum::list_posts))
        .route("/v1/forum/posts/add", post(forum::create_post))
        .route(
            "/v1/forum/posts/:post_id",
            get(forum::get_post).put(forum::update_post).delete(forum::delete_post),
        )
        .route("/v1/forum/posts/:post_id/replies", post(forum::create_reply))
        .route(
            "/v1/forum/replies/:reply_id",
            put(forum::update_reply).delete(forum::delete_reply),
        )
}

fn journal_routes() -> Router<AppState> {
    use protected::journal;

    Router::new()
        .route("/v1/journal", get(journal::list).post(journal::create))
        .route(
            "/v1/journal/:entry_id",
            get(journal::get).put(journal::update).delete(journal::delete),
        )
}

fn document_routes() -> Router<AppState> {
    use axum::routing::delete;
    use protected::documents;

    Router::new()
        .route(
            "/v1/baby/:babyId/documents",
            get(documents::list).post(documents::share),
        )
        .route("/v1/baby/:babyId/documents/:documentId", delete(documents::delete))
        .route("/v1/doctor/documents", get(documents::doctor_inbox))
}

fn export_routes() -> Router<AppState> {
    use protected::export;

    Router::new()
        .route("/v1/export", post(export::create))
        .route("/v1/export/history", get(export::history))
}

fn lookup_routes() -> Router<AppState> {
    use protected::lookups;

    Router::new()
        .route("/v1/coupons", get(lookups::coupons))
        .route("/v1/quiz", get(lookups::quiz))
        .route("/v1/tips", get(lookups::tips))
}

fn provider_routes() -> Router<AppState> {
    use protected::providers;

    Router::new()
        .route("/v1/providers", get(providers::list))
        .route("/v1/providers/favorites", get(providers::favorites))
        .route("/v1/providers/:providerId/favorite", post(providers::toggle_favorite))
}
