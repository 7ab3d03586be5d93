use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::candidate_dto::{
        CandidateListResponse, CandidateResponse, CreateCandidatePayload, InterviewEntryPayload,
        ListCandidatesQuery, Pagination, UpdateCandidatePayload, UpdateInterviewPayload,
    },
    error::Result,
    routes::extract::{ApiJson, ApiPath, ApiQuery},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 1000"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on name, email, recruiter or sales person, or an exact candidate id"),
        ("filter" = Option<String>, Query, description = "not_conducted | one_interview | two_interviews | three_plus | upcoming"),
        ("upcoming_date" = Option<String>, Query, description = "Only candidates whose next interview falls on this UTC day (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Candidates page", body = Json<CandidateListResponse>),
        (status = 400, description = "Malformed upcoming_date")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListCandidatesQuery>,
) -> Result<impl IntoResponse> {
    let list = state.candidate_service.list(&params).await?;
    let pagination = Pagination::new(list.page, list.limit, list.total);
    Ok(Json(CandidateListResponse {
        items: list.items.into_iter().map(CandidateResponse::from).collect(),
        total: list.total,
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CreateCandidatePayload,
    responses(
        (status = 201, description = "Candidate created", body = Json<CandidateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email or phone already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.create_candidate(payload).await?;
    Ok((StatusCode::CREATED, Json(CandidateResponse::from(candidate))))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = Json<CandidateResponse>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_candidate(id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

/// Serves both PUT and PATCH; absent fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = Json<CandidateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found"),
        (status = 409, description = "Email or phone already registered")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.update_candidate(id, payload).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_candidate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.candidate_service.delete_candidate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/interviews",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    request_body = InterviewEntryPayload,
    responses(
        (status = 201, description = "Interview round added", body = Json<CandidateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn add_interview(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<InterviewEntryPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.add_interview(id, payload).await?;
    Ok((StatusCode::CREATED, Json(CandidateResponse::from(candidate))))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}/interviews/{interview_id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID"),
        ("interview_id" = Uuid, Path, description = "Interview round ID")
    ),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview round updated", body = Json<CandidateResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    ApiPath((id, interview_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .update_interview(id, interview_id, payload)
        .await?;
    Ok(Json(CandidateResponse::from(candidate)))
}

#[utoipa::path(
    delete,
    path = "/api/candidates/{id}/interviews/{interview_id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID"),
        ("interview_id" = Uuid, Path, description = "Interview round ID")
    ),
    responses(
        (status = 200, description = "Interview round removed", body = Json<CandidateResponse>),
        (status = 404, description = "Candidate or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_interview(
    State(state): State<AppState>,
    ApiPath((id, interview_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .candidate_service
        .remove_interview(id, interview_id)
        .await?;
    Ok(Json(CandidateResponse::from(candidate)))
}
