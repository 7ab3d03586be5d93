use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::dto::candidate_dto::{
    CandidateListResponse, CandidateResponse, CreateCandidatePayload, InterviewEntryPayload,
    Pagination, UpdateCandidatePayload, UpdateInterviewPayload,
};
use crate::dto::stats_dto::{
    CompanyStats, DetailedStats, InterviewTypeCount, MonthlyTrend, Overview, RatingCount,
    RecruiterStats, SalesPersonStats, SalesStatsResponse, ScheduleResponse, ScheduledInterview,
    StatusCount,
};
use crate::models::candidate::{
    Candidate, CandidateStatus, Company, InterviewEntry, InterviewStatus, InterviewType, Timezone,
};
use crate::routes::{candidate_routes, health, stats_routes};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        candidate_routes::list_candidates,
        candidate_routes::create_candidate,
        candidate_routes::get_candidate,
        candidate_routes::update_candidate,
        candidate_routes::delete_candidate,
        candidate_routes::add_interview,
        candidate_routes::update_interview,
        candidate_routes::remove_interview,
        stats_routes::detailed_stats,
        stats_routes::sales_stats,
        stats_routes::today_schedule,
        stats_routes::status_breakdown,
        stats_routes::interview_types,
        stats_routes::recruiters,
        stats_routes::sales,
        stats_routes::companies,
        stats_routes::ratings,
        stats_routes::monthly,
        stats_routes::overview,
    ),
    components(schemas(
        Candidate,
        CandidateStatus,
        Company,
        InterviewEntry,
        InterviewStatus,
        InterviewType,
        Timezone,
        CandidateResponse,
        CandidateListResponse,
        Pagination,
        CreateCandidatePayload,
        UpdateCandidatePayload,
        InterviewEntryPayload,
        UpdateInterviewPayload,
        StatusCount,
        InterviewTypeCount,
        RecruiterStats,
        SalesPersonStats,
        SalesStatsResponse,
        CompanyStats,
        RatingCount,
        MonthlyTrend,
        Overview,
        ScheduledInterview,
        ScheduleResponse,
        DetailedStats,
    )),
    tags((name = "candidates", description = "Interview candidate tracking"))
)]
pub struct ApiDoc;

#[axum::debug_handler]
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
