use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::{
    Candidate, CandidateStatus, Company, InterviewEntry, InterviewStatus, InterviewType, Timezone,
};
use crate::utils::time::{flexible, flexible_option};
use crate::utils::validation::{validate_interview_time, validate_not_blank, validate_phone};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InterviewEntryPayload {
    pub id: Option<Uuid>,
    #[serde(with = "flexible")]
    #[schema(value_type = String, format = DateTime)]
    pub interview_date: DateTime<Utc>,
    #[serde(default)]
    #[validate(custom(function = "validate_interview_time"))]
    pub interview_time: String,
    #[serde(default)]
    pub interview_timezone: Timezone,
    #[validate(custom(function = "validate_not_blank"))]
    pub interviewer_name: String,
    #[serde(default)]
    pub interview_type: InterviewType,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub feedback: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    pub round_number: Option<u32>,
}

impl InterviewEntryPayload {
    pub fn normalize(&mut self) {
        self.interviewer_name = self.interviewer_name.trim().to_string();
        self.interview_time = self.interview_time.trim().to_string();
    }

    /// Round number 0 marks "not given"; derivation fills it in.
    pub fn into_entry(self) -> InterviewEntry {
        InterviewEntry {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            interview_date: self.interview_date,
            interview_time: self.interview_time,
            interview_timezone: self.interview_timezone,
            interviewer_name: self.interviewer_name,
            interview_type: self.interview_type,
            status: self.status,
            feedback: self.feedback,
            rating: self.rating,
            round_number: self.round_number.unwrap_or(0),
        }
    }
}

/// Writable candidate fields. Derived fields are not part of the payload and
/// are dropped if a client sends them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCandidatePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub candidate_name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub candidate_email: String,
    #[validate(custom(function = "validate_phone"))]
    pub candidate_phone_no: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub recruiter_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub sales_person_name: String,
    pub interviewed_company_name: Company,
    #[serde(default)]
    #[validate(length(
        max = 3000,
        message = "Job description cannot exceed 3000 characters"
    ))]
    pub job_description: String,
    pub current_status: Option<CandidateStatus>,
    #[serde(default, with = "flexible_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub when_enrolled: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(nested)]
    pub interview_history: Vec<InterviewEntryPayload>,
}

impl CreateCandidatePayload {
    pub fn normalize(&mut self) {
        self.candidate_name = self.candidate_name.trim().to_string();
        self.candidate_email = self.candidate_email.trim().to_lowercase();
        self.candidate_phone_no = self.candidate_phone_no.trim().to_string();
        self.recruiter_name = self.recruiter_name.trim().to_string();
        self.sales_person_name = self.sales_person_name.trim().to_string();
        self.job_description = self.job_description.trim().to_string();
        self.interview_history
            .iter_mut()
            .for_each(InterviewEntryPayload::normalize);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCandidatePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub candidate_name: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    pub candidate_email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub candidate_phone_no: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub recruiter_name: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub sales_person_name: Option<String>,
    pub interviewed_company_name: Option<Company>,
    #[validate(length(
        max = 3000,
        message = "Job description cannot exceed 3000 characters"
    ))]
    pub job_description: Option<String>,
    pub current_status: Option<CandidateStatus>,
    #[serde(default, with = "flexible_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub when_enrolled: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub interview_history: Option<Vec<InterviewEntryPayload>>,
}

impl UpdateCandidatePayload {
    pub fn normalize(&mut self) {
        fn trim(value: &mut Option<String>) {
            if let Some(v) = value {
                *v = v.trim().to_string();
            }
        }
        trim(&mut self.candidate_name);
        trim(&mut self.candidate_phone_no);
        trim(&mut self.recruiter_name);
        trim(&mut self.sales_person_name);
        trim(&mut self.job_description);
        if let Some(email) = &mut self.candidate_email {
            *email = email.trim().to_lowercase();
        }
        if let Some(history) = &mut self.interview_history {
            history.iter_mut().for_each(InterviewEntryPayload::normalize);
        }
    }
}

/// Partial edit of a single interview round.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInterviewPayload {
    #[serde(default, with = "flexible_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub interview_date: Option<DateTime<Utc>>,
    #[validate(custom(function = "validate_interview_time"))]
    pub interview_time: Option<String>,
    pub interview_timezone: Option<Timezone>,
    #[validate(custom(function = "validate_not_blank"))]
    pub interviewer_name: Option<String>,
    pub interview_type: Option<InterviewType>,
    pub status: Option<InterviewStatus>,
    pub feedback: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    pub round_number: Option<u32>,
}

impl UpdateInterviewPayload {
    pub fn normalize(&mut self) {
        if let Some(time) = self.interview_time.as_mut() {
            *time = time.trim().to_string();
        }
        if let Some(name) = self.interviewer_name.as_mut() {
            *name = name.trim().to_string();
        }
    }

    pub fn apply(self, entry: &mut InterviewEntry) {
        if let Some(date) = self.interview_date {
            entry.interview_date = date;
        }
        if let Some(time) = self.interview_time {
            entry.interview_time = time;
        }
        if let Some(tz) = self.interview_timezone {
            entry.interview_timezone = tz;
        }
        if let Some(name) = self.interviewer_name {
            entry.interviewer_name = name;
        }
        if let Some(kind) = self.interview_type {
            entry.interview_type = kind;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(feedback) = self.feedback {
            entry.feedback = feedback;
        }
        if let Some(rating) = self.rating {
            entry.rating = Some(rating);
        }
        if let Some(round) = self.round_number {
            entry.round_number = round;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub progress_percentage: u8,
}

impl From<Candidate> for CandidateResponse {
    fn from(candidate: Candidate) -> Self {
        let progress_percentage = candidate.current_status.progress_percentage();
        Self {
            candidate,
            progress_percentage,
        }
    }
}

/// Raw list parameters. Kept as strings so malformed page/limit values fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListCandidatesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub filter: Option<String>,
    pub upcoming_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub current: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            current: page,
            total_pages,
            limit,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidateListResponse {
    pub items: Vec<CandidateResponse>,
    pub total: i64,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> serde_json::Value {
        json!({
            "candidate_name": "  Asha Rao ",
            "candidate_email": " Asha.Rao@Example.com ",
            "candidate_phone_no": "9876543210",
            "recruiter_name": "Meera",
            "sales_person_name": "Kiran",
            "interviewed_company_name": "DetaPent",
            "interview_history": [
                { "interview_date": "2024-01-10", "interviewer_name": "Ravi", "status": "Completed", "rating": 4 }
            ]
        })
    }

    #[test]
    fn create_payload_normalizes_and_validates() {
        let mut payload: CreateCandidatePayload = serde_json::from_value(valid_payload()).unwrap();
        payload.normalize();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.candidate_name, "Asha Rao");
        assert_eq!(payload.candidate_email, "asha.rao@example.com");
        assert_eq!(payload.interview_history[0].interview_type, InterviewType::Phone);
    }

    #[test]
    fn derived_fields_in_the_body_are_ignored() {
        let mut body = valid_payload();
        body["interview_count"] = json!(42);
        body["interview_by"] = json!("Someone Else");
        let payload: CreateCandidatePayload = serde_json::from_value(body).unwrap();
        assert_eq!(payload.interview_history.len(), 1);
    }

    #[test]
    fn out_of_range_rating_fails_nested_validation() {
        let mut body = valid_payload();
        body["interview_history"][0]["rating"] = json!(7);
        let payload: CreateCandidatePayload = serde_json::from_value(body).unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn unknown_company_is_rejected_at_deserialization() {
        let mut body = valid_payload();
        body["interviewed_company_name"] = json!("Initech");
        assert!(serde_json::from_value::<CreateCandidatePayload>(body).is_err());
    }

    #[test]
    fn bad_phone_and_email_fail_validation() {
        let mut body = valid_payload();
        body["candidate_phone_no"] = json!("12-34");
        body["candidate_email"] = json!("not-an-email");
        let payload: CreateCandidatePayload = serde_json::from_value(body).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("candidate_phone_no"));
        assert!(fields.contains_key("candidate_email"));
    }

    #[test]
    fn pagination_flags() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn interview_patch_is_trimmed_before_validation() {
        let mut patch = UpdateInterviewPayload {
            interview_time: Some(" 10:00 ".into()),
            interviewer_name: Some("  Nina ".into()),
            ..Default::default()
        };
        patch.normalize();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.interview_time.as_deref(), Some("10:00"));
        assert_eq!(patch.interviewer_name.as_deref(), Some("Nina"));
    }
}
