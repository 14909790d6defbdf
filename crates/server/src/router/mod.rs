//! # API Router Configuration
//!
//! Wires the HTTP surface of the feedback tracker. Wrappers here only run
//! extractors and hand the results to the inner handlers in
//! [`crate::handlers`]; extractor rejections become standard error bodies.

use axum::{
    Json,
    Router,
    extract::{
        Extension,
        Path,
        Query,
        State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    middleware,
    routing::{get, post, put},
};
use error::Result;

use crate::{
    AppState,
    dto::{
        HealthResponse,
        MessageResponse,
        account::{LoginRequest, ResendVerificationQuery, TokenResponse, VerifyEmailQuery},
        dashboard::DashboardStats,
        feedback::{CreateFeedbackRequest, FeedbackResponse, UpdateFeedbackRequest},
        feedback_requests::{CreateFeedbackRequestRequest, FeedbackRequestResponse},
        tags::{CreateTagRequest, TagResponse},
        users::{CreateUserRequest, UserResponse},
    },
    handlers,
    middleware::{
        auth::{AuthenticatedUser, auth_middleware},
        request_log::request_log_middleware,
    },
};

/// Creates the API router with all routes
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Router with public and bearer-protected routes, state applied
pub fn create_router(state: AppState) -> Router {
    let auth = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/team", get(team_members_handler))
        .route("/users/managers", get(managers_handler))
        .route(
            "/feedback",
            get(list_feedback_handler).post(create_feedback_handler),
        )
        .route("/feedback/:id", put(update_feedback_handler))
        .route(
            "/feedback/:id/acknowledge",
            post(acknowledge_feedback_handler),
        )
        .route(
            "/feedback-requests",
            get(list_feedback_requests_handler).post(create_feedback_request_handler),
        )
        .route("/dashboard/stats", get(dashboard_stats_handler))
        .route_layer(auth());

    // Public routes that don't require authentication
    let public_routes = Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/verify-email", post(verify_email_handler))
        .route(
            "/auth/resend-verification",
            post(resend_verification_handler),
        )
        .route(
            "/tags",
            get(list_tags_handler).merge(post(create_tag_handler).route_layer(auth())),
        );

    public_routes.merge(protected_routes).with_state(state)
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Main router with health checks and API routes, every request logged and
/// tagged with a request id
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state))
        .layer(middleware::from_fn(request_log_middleware))
}

async fn health_handler(AxumState(state): AxumState<AppState>) -> Json<HealthResponse> {
    handlers::health::health_handler(&state).await
}

async fn login_handler(
    AxumState(state): AxumState<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = payload?;
    handlers::account::login_handler(&state, req).await
}

async fn me_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    handlers::account::me_handler(&state, user).await
}

async fn verify_email_handler(
    AxumState(state): AxumState<AppState>,
    query: std::result::Result<Query<VerifyEmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>> {
    let Query(query) = query?;
    handlers::account::verify_email_handler(&state, query).await
}

async fn resend_verification_handler(
    AxumState(state): AxumState<AppState>,
    query: std::result::Result<Query<ResendVerificationQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>> {
    let Query(query) = query?;
    handlers::account::resend_verification_handler(&state, query).await
}

async fn list_users_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>> {
    handlers::users::list_users_handler(&state, user).await
}

async fn create_user_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = payload?;
    handlers::users::create_user_handler(&state, user, req).await
}

async fn team_members_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>> {
    handlers::users::team_members_handler(&state, user).await
}

async fn managers_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserResponse>>> {
    handlers::users::managers_handler(&state, user).await
}

async fn list_feedback_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<FeedbackResponse>>> {
    handlers::feedback::list_feedback_handler(&state, user).await
}

async fn create_feedback_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>> {
    let Json(req) = payload?;
    handlers::feedback::create_feedback_handler(&state, user, req).await
}

async fn update_feedback_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>> {
    let Path(feedback_id) = id?;
    let Json(req) = payload?;
    handlers::feedback::update_feedback_handler(&state, user, feedback_id, req).await
}

async fn acknowledge_feedback_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(feedback_id) = id?;
    handlers::feedback::acknowledge_feedback_handler(&state, user, feedback_id).await
}

async fn list_tags_handler(AxumState(state): AxumState<AppState>) -> Result<Json<Vec<TagResponse>>> {
    handlers::tags::list_tags_handler(&state).await
}

async fn create_tag_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<Json<TagResponse>> {
    let Json(req) = payload?;
    handlers::tags::create_tag_handler(&state, user, req).await
}

async fn list_feedback_requests_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<FeedbackRequestResponse>>> {
    handlers::feedback_requests::list_feedback_requests_handler(&state, user).await
}

async fn create_feedback_request_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<CreateFeedbackRequestRequest>, JsonRejection>,
) -> Result<Json<FeedbackRequestResponse>> {
    let Json(req) = payload?;
    handlers::feedback_requests::create_feedback_request_handler(&state, user, req).await
}

async fn dashboard_stats_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DashboardStats>> {
    handlers::dashboard::dashboard_stats_handler(&state, user).await
}
