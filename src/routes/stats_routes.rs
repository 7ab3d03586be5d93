use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        candidate_dto::ScheduleQuery,
        stats_dto::{
            CompanyStats, DetailedStats, InterviewTypeCount, MonthlyTrend, Overview, RatingCount,
            RecruiterStats, SalesStatsResponse, ScheduleResponse, StatusCount,
        },
    },
    error::Result,
    routes::extract::ApiQuery,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/detailed-stats",
    responses(
        (status = 200, description = "Every dashboard report in one body", body = Json<DetailedStats>)
    )
)]
#[axum::debug_handler]
pub async fn detailed_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.detailed().await?))
}

#[utoipa::path(
    get,
    path = "/api/candidates/sales-stats",
    responses(
        (status = 200, description = "Per sales person rollup", body = Json<SalesStatsResponse>)
    )
)]
#[axum::debug_handler]
pub async fn sales_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.sales().await?))
}

#[utoipa::path(
    get,
    path = "/api/candidates/today-schedule",
    params(
        ("date" = Option<String>, Query, description = "Day to list as YYYY-MM-DD, defaults to today (UTC)")
    ),
    responses(
        (status = 200, description = "Scheduled interviews for the day", body = Json<ScheduleResponse>),
        (status = 400, description = "Malformed date")
    )
)]
#[axum::debug_handler]
pub async fn today_schedule(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ScheduleQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(
        state.report_service.schedule(query.date.as_deref()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/stats/status",
    responses((status = 200, description = "Candidates per status", body = [StatusCount]))
)]
#[axum::debug_handler]
pub async fn status_breakdown(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.status_breakdown().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/interview-types",
    responses((status = 200, description = "Interview rounds per type", body = [InterviewTypeCount]))
)]
#[axum::debug_handler]
pub async fn interview_types(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.interview_types().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/recruiters",
    responses((status = 200, description = "Per recruiter rollup", body = [RecruiterStats]))
)]
#[axum::debug_handler]
pub async fn recruiters(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.recruiters().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/sales",
    responses((status = 200, description = "Per sales person rollup", body = Json<SalesStatsResponse>))
)]
#[axum::debug_handler]
pub async fn sales(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.sales().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/companies",
    responses((status = 200, description = "Per company rollup", body = [CompanyStats]))
)]
#[axum::debug_handler]
pub async fn companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.companies().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/ratings",
    responses((status = 200, description = "Rated interview rounds per rating", body = [RatingCount]))
)]
#[axum::debug_handler]
pub async fn ratings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.ratings().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/monthly",
    responses((status = 200, description = "Enrolments over the last six months", body = [MonthlyTrend]))
)]
#[axum::debug_handler]
pub async fn monthly(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.monthly().await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/overview",
    responses((status = 200, description = "Pipeline totals and rates", body = Json<Overview>))
)]
#[axum::debug_handler]
pub async fn overview(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.overview().await?))
}
