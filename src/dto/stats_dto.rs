use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::candidate::{CandidateStatus, Company, InterviewType, Timezone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: CandidateStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InterviewTypeCount {
    pub interview_type: InterviewType,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecruiterStats {
    pub name: String,
    pub candidate_count: i64,
    pub avg_interviews: f64,
    pub total_interviews: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesPersonStats {
    pub name: String,
    pub candidate_count: i64,
    pub interviews_completed: i64,
    pub avg_interview_count: f64,
    pub upcoming_interviews: i64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompanyStats {
    pub name: Company,
    pub candidate_count: i64,
    pub avg_interviews: f64,
    pub total_interviews: i64,
    pub hired_count: i64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingCount {
    pub rating: u8,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub candidates_added: i64,
    pub interviews_conducted: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Overview {
    pub total_candidates: i64,
    pub total_interviews: i64,
    pub hired_count: i64,
    pub rejected_count: i64,
    pub avg_interviews_per_candidate: f64,
    pub success_rate: f64,
    pub rejection_rate: f64,
    pub pending_feedback: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduledInterview {
    pub candidate_id: Uuid,
    pub interview_id: Uuid,
    pub candidate_name: String,
    pub company_name: Company,
    pub interviewer_name: String,
    pub interview_type: InterviewType,
    pub interview_date: DateTime<Utc>,
    pub interview_timezone: Timezone,
    pub round_number: u32,
    /// `HH:MM` of `interview_date` in UTC.
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponse {
    pub date: NaiveDate,
    pub interviews: Vec<ScheduledInterview>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesStatsResponse {
    pub sales_persons: Vec<SalesPersonStats>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetailedStats {
    pub status_breakdown: Vec<StatusCount>,
    pub interview_type_stats: Vec<InterviewTypeCount>,
    pub recruiters: Vec<RecruiterStats>,
    pub companies: Vec<CompanyStats>,
    pub rating_distribution: Vec<RatingCount>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub overview: Overview,
}
