//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::admin::{
    get_system_info, list_applications_for_review, list_companies_for_moderation,
    list_professionals_for_moderation, publish_post, review_application, set_company_featured,
    set_company_status, set_job_featured, set_professional_status,
};
use crate::handlers::applications::{
    apply_to_job, delete_application, list_job_applications, list_my_applications,
    update_application,
};
use crate::handlers::blog::{
    create_category, create_post, create_tag, delete_category, delete_post, delete_tag,
    get_post_by_slug, list_categories, list_posts, list_tags, update_post,
};
use crate::handlers::companies::{
    create_company, delete_company, get_company, list_companies, list_my_companies, update_company,
};
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{
    create_job, delete_job, get_job, list_jobs, list_my_jobs, transition_job, update_job,
};
use crate::handlers::professionals::{
    create_professional, delete_professional, get_professional, list_professionals,
    update_professional,
};
use crate::handlers::uploads::{presign_logo, presign_resume};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let company_routes = Router::new()
        .route("/empresas", get(list_companies))
        .route("/empresas", post(create_company))
        .route("/empresas/:id", get(get_company))
        .route("/empresas/:id", patch(update_company))
        .route("/empresas/:id", delete(delete_company))
        .route("/user/empresas", get(list_my_companies));

    let professional_routes = Router::new()
        .route("/profissionais", get(list_professionals))
        .route("/profissionais", post(create_professional))
        .route("/profissionais/:id", get(get_professional))
        .route("/profissionais/:id", patch(update_professional))
        .route("/profissionais/:id", delete(delete_professional));

    let job_routes = Router::new()
        .route("/vagas", get(list_jobs))
        .route("/vagas", post(create_job))
        .route("/vagas/:id", get(get_job))
        .route("/vagas/:id", patch(update_job))
        .route("/vagas/:id", delete(delete_job))
        // Lifecycle transitions live on their own endpoint; the generic
        // patch drops status for non-admin callers.
        .route("/vagas/:id/status", patch(transition_job))
        .route("/user/vagas", get(list_my_jobs));

    let application_routes = Router::new()
        .route("/vagas/:id/candidaturas", post(apply_to_job))
        .route("/vagas/:id/candidaturas", get(list_job_applications))
        .route("/candidaturas/:id", patch(update_application))
        .route("/candidaturas/:id", delete(delete_application))
        .route("/user/candidaturas", get(list_my_applications));

    let blog_routes = Router::new()
        .route("/posts", get(list_posts))
        .route("/posts", post(create_post))
        .route("/posts/slug/:slug", get(get_post_by_slug))
        .route("/posts/:id", patch(update_post))
        .route("/posts/:id", delete(delete_post))
        .route("/categorias", get(list_categories))
        .route("/categorias", post(create_category))
        .route("/categorias/:id", delete(delete_category))
        .route("/tags", get(list_tags))
        .route("/tags", post(create_tag))
        .route("/tags/:id", delete(delete_tag));

    let upload_routes = Router::new()
        .route("/uploads/curriculo", post(presign_resume))
        .route("/uploads/logo", post(presign_logo));

    // Moderation endpoints (admin permission label)
    let admin_routes = Router::new()
        .route("/admin/empresas", get(list_companies_for_moderation))
        .route("/admin/empresas/:id/status", patch(set_company_status))
        .route("/admin/empresas/:id/destaque", patch(set_company_featured))
        .route("/admin/profissionais", get(list_professionals_for_moderation))
        .route("/admin/profissionais/:id/status", patch(set_professional_status))
        .route("/admin/vagas/:id/destaque", patch(set_job_featured))
        .route("/admin/candidaturas", get(list_applications_for_review))
        .route("/admin/candidaturas/:id/status", patch(review_application))
        .route("/admin/posts/:id/publicar", post(publish_post))
        .route("/admin/system/info", get(get_system_info));

    // Per-IP rate limiter shared by the API routes
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(company_routes)
        .merge(professional_routes)
        .merge(job_routes)
        .merge(application_routes)
        .merge(blog_routes)
        .merge(upload_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Body size limit guards every route
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
