use axum::{
    extract::DefaultBodyLimit,
    http::{header::CACHE_CONTROL, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authenticate, require_manager, require_self_or_manager};
use crate::state::AppState;

/// QR images never change for a given URL
const QR_CACHE_CONTROL: &str = "public, max-age=31557600";

/// Build the full router. Layers on a route group run outermost-last, so
/// `authenticate` always sees the request before the group's policy.
pub fn app(state: AppState) -> Router {
    let api_config = &state.config.api;

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(owner_routes(state.clone()))
        .merge(manager_routes(state.clone()))
        .nest_service("/qrcodes", qr_images(&state.config.qr.directory))
        .layer(DefaultBodyLimit::max(api_config.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state.config.security) {
        router = router.layer(cors);
    }
    if api_config.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/feedback/:advisorId", get(public::form_get))
        .route("/api/feedback/submit/:advisorId", post(public::submit_post))
        .route("/submit-feedback", post(public::legacy_submit_post))
        .route("/api/advisors/login", post(public::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami_get))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn owner_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/advisors/:advisorId", get(protected::advisor_get))
        .route("/api/advisors/:advisorId/performance", get(protected::performance_get))
        .route_layer(middleware::from_fn(require_self_or_manager))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn manager_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/advisors", get(elevated::advisor_list))
        .route("/api/advisors/qr/refresh", post(elevated::qr_refresh_post))
        .route_layer(middleware::from_fn(require_manager))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn qr_images(directory: &str) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static(QR_CACHE_CONTROL))
        .layer(ServeDir::new(directory))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
