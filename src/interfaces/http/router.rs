//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AdminRequestService, RoleService, UserService};
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, UserRole};
use crate::interfaces::http::common::MessageResponse;
use crate::interfaces::http::middleware::{auth_middleware, require_role, AuthState};
use crate::interfaces::http::modules::{admin, auth, health, metrics};
use crate::interfaces::http::rate_limit::{login_throttle_middleware, LoginThrottle};
use crate::interfaces::http::request_id::request_id_middleware;

/// Security scheme modifier for OpenAPI
struct SecurityAddon {
    cookie_name: String,
}

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /auth/login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(&self.cookie_name))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::get_current_user,
        auth::edit_profile,
        auth::update_password,
        auth::delete_account,
        // Admin
        admin::create_admin_request,
        admin::validate_admin_request,
        admin::list_admin_requests,
        admin::change_to_admin,
        admin::change_to_paid,
        admin::change_to_regular,
    ),
    components(
        schemas(
            MessageResponse,
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::UserProfile,
            auth::EditProfileRequest,
            auth::UpdatePasswordRequest,
            admin::CreateAdminRequestRequest,
            admin::AdminRequestCreated,
            admin::AdminRequestDto,
            admin::ValidateAdminRequestRequest,
            admin::ResolutionResponse,
            admin::ChangeRoleRequest,
            admin::RoleChangeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, sessions and self-service profile"),
        (name = "Admin", description = "Admin promotion requests and role changes"),
    ),
    info(
        title = "Account Service API",
        version = "0.1.0",
        description = "User accounts, sessions and the admin promotion workflow"
    )
)]
pub struct ApiDoc;

/// OpenAPI document with the security schemes for the configured cookie
pub fn openapi_document(cookie_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    SecurityAddon {
        cookie_name: cookie_name.to_string(),
    }
    .modify(&mut doc);
    doc
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    match config.server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!(
                origin = %config.server.cors_origin,
                "Invalid CORS origin, cross-origin requests will be refused: {}", e
            );
            cors
        }
    }
}

/// Create the API router
///
/// `throttle` is owned by the caller so the expiry sweep can share it.
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    config: &AppConfig,
    metrics_handle: PrometheusHandle,
    throttle: Arc<LoginThrottle>,
) -> Router {
    let jwt_config = config.jwt_config();

    let auth_gate = AuthState {
        jwt_config: jwt_config.clone(),
        cookie_name: config.security.cookie_name.clone(),
    };

    let auth_state = auth::AuthHandlerState {
        users: UserService::new(repos.clone(), jwt_config),
        cookie: auth::SessionCookie::from_config(config),
    };

    let admin_state = admin::AdminHandlerState {
        requests: AdminRequestService::new(repos.clone()),
        roles: RoleService::new(repos),
    };

    // Auth routes (public)
    let auth_public_routes = Router::new()
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Login (throttled per client)
    let login_routes = Router::new()
        .route("/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            throttle,
            login_throttle_middleware,
        ))
        .with_state(auth_state.clone());

    // Auth routes (session)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user))
        .route("/edit", put(auth::edit_profile))
        .route("/update-password", put(auth::update_password))
        .route("/delete", delete(auth::delete_account))
        .route_layer(middleware::from_fn_with_state(
            auth_gate.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Admin routes (public)
    let admin_public_routes = Router::new()
        .route("/create-admin-request", post(admin::create_admin_request))
        .with_state(admin_state.clone());

    // Admin routes (session + admin role); the last route_layer runs first
    let admin_protected_routes = Router::new()
        .route("/validate-admin-request", post(admin::validate_admin_request))
        .route("/admin-requests", get(admin::list_admin_requests))
        .route("/change-to-admin", put(admin::change_to_admin))
        .route("/change-to-paid", put(admin::change_to_paid))
        .route("/change-to-regular", put(admin::change_to_regular))
        .route_layer(middleware::from_fn_with_state(UserRole::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(auth_gate, auth_middleware))
        .with_state(admin_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(db));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: metrics_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url(
        "/api-doc/openapi.json",
        openapi_document(&config.security.cookie_name),
    );

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health / metrics
        .merge(health_routes)
        .merge(metrics_routes)
        // Auth
        .nest(
            "/auth",
            auth_public_routes
                .merge(login_routes)
                .merge(auth_protected_routes),
        )
        // Admin
        .nest(
            "/admin",
            admin_public_routes.merge(admin_protected_routes),
        )
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}
