pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::database::store::CandidateStore;
use crate::services::{candidate_service::CandidateService, report_service::ReportService};

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub candidate_service: CandidateService,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        let candidate_service = CandidateService::new(store.clone());
        let report_service = ReportService::new(store.clone());

        Self {
            store,
            candidate_service,
            report_service,
        }
    }
}

/// All HTTP routes, without transport layers (CORS, tracing) so tests can
/// drive the router directly.
pub fn app(state: AppState) -> Router {
    let candidate_api = Router::new()
        .route(
            "/api/candidates",
            get(routes::candidate_routes::list_candidates)
                .post(routes::candidate_routes::create_candidate),
        )
        .route(
            "/api/candidates/detailed-stats",
            get(routes::stats_routes::detailed_stats),
        )
        .route(
            "/api/candidates/sales-stats",
            get(routes::stats_routes::sales_stats),
        )
        .route(
            "/api/candidates/today-schedule",
            get(routes::stats_routes::today_schedule),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidate_routes::get_candidate)
                .put(routes::candidate_routes::update_candidate)
                .patch(routes::candidate_routes::update_candidate)
                .delete(routes::candidate_routes::delete_candidate),
        )
        .route(
            "/api/candidates/:id/interviews",
            axum::routing::post(routes::candidate_routes::add_interview),
        )
        .route(
            "/api/candidates/:id/interviews/:interview_id",
            axum::routing::patch(routes::candidate_routes::update_interview)
                .delete(routes::candidate_routes::remove_interview),
        );

    let stats_api = Router::new()
        .route("/api/stats/status", get(routes::stats_routes::status_breakdown))
        .route(
            "/api/stats/interview-types",
            get(routes::stats_routes::interview_types),
        )
        .route("/api/stats/recruiters", get(routes::stats_routes::recruiters))
        .route("/api/stats/sales", get(routes::stats_routes::sales))
        .route("/api/stats/companies", get(routes::stats_routes::companies))
        .route("/api/stats/ratings", get(routes::stats_routes::ratings))
        .route("/api/stats/monthly", get(routes::stats_routes::monthly))
        .route("/api/stats/overview", get(routes::stats_routes::overview));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/openapi.json", get(routes::openapi::openapi_json))
        .merge(candidate_api)
        .merge(stats_api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
