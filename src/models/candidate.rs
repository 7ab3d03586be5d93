use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Declares a closed set of values stored as text, with the exact wire
/// spelling used both in JSON and in the database.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "Invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

text_enum! {
    /// Pipeline stage of a candidate.
    CandidateStatus {
        Applied => "Applied",
        Screening => "Screening",
        Interview => "Interview",
        FinalRound => "Final Round",
        Offer => "Offer",
        Hired => "Hired",
        Rejected => "Rejected",
    }
}

text_enum! {
    Company {
        CodersData => "CodersData",
        DetaPent => "DetaPent",
        MatricsTek => "MatricsTek",
    }
}

text_enum! {
    InterviewType {
        Phone => "Phone",
        Video => "Video",
        InPerson => "In-person",
        Technical => "Technical",
        Hr => "HR",
        Final => "Final",
    }
}

text_enum! {
    InterviewStatus {
        Scheduled => "Scheduled",
        Completed => "Completed",
        Cancelled => "Cancelled",
        Rescheduled => "Rescheduled",
    }
}

text_enum! {
    Timezone {
        Ist => "IST",
        Est => "EST",
        Cst => "CST",
        Mst => "MST",
        Pst => "PST",
    }
}

impl Default for CandidateStatus {
    fn default() -> Self {
        CandidateStatus::Applied
    }
}

impl Default for InterviewType {
    fn default() -> Self {
        InterviewType::Phone
    }
}

impl Default for InterviewStatus {
    fn default() -> Self {
        InterviewStatus::Scheduled
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone::Ist
    }
}

impl CandidateStatus {
    /// Rough position in the pipeline, shown as a progress bar by clients.
    pub fn progress_percentage(&self) -> u8 {
        match self {
            CandidateStatus::Applied => 10,
            CandidateStatus::Screening => 25,
            CandidateStatus::Interview => 50,
            CandidateStatus::FinalRound => 75,
            CandidateStatus::Offer => 90,
            CandidateStatus::Hired => 100,
            CandidateStatus::Rejected => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InterviewEntry {
    pub id: Uuid,
    pub interview_date: DateTime<Utc>,
    #[serde(default)]
    pub interview_time: String,
    #[serde(default)]
    pub interview_timezone: Timezone,
    pub interviewer_name: String,
    #[serde(default)]
    pub interview_type: InterviewType,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub rating: Option<u8>,
    pub round_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Candidate {
    pub id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone_no: String,
    pub recruiter_name: String,
    pub sales_person_name: String,
    pub interviewed_company_name: Company,
    pub job_description: String,
    pub current_status: CandidateStatus,
    pub when_enrolled: DateTime<Utc>,
    pub interview_count: i32,
    pub last_date_of_interview: Option<DateTime<Utc>>,
    pub upcoming_interview_date: Option<DateTime<Utc>>,
    pub interview_by: String,
    pub interview_history: Vec<InterviewEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn interview(&self, interview_id: Uuid) -> Option<&InterviewEntry> {
        self.interview_history.iter().find(|i| i.id == interview_id)
    }

    pub fn interview_mut(&mut self, interview_id: Uuid) -> Option<&mut InterviewEntry> {
        self.interview_history
            .iter_mut()
            .find(|i| i.id == interview_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_enums_round_trip_their_wire_spelling() {
        for status in CandidateStatus::ALL {
            assert_eq!(status.as_str().parse::<CandidateStatus>().unwrap(), *status);
        }
        assert_eq!(
            serde_json::to_value(InterviewType::InPerson).unwrap(),
            serde_json::json!("In-person")
        );
        assert_eq!(
            serde_json::from_value::<CandidateStatus>(serde_json::json!("Final Round")).unwrap(),
            CandidateStatus::FinalRound
        );
    }

    #[test]
    fn unknown_text_is_rejected_with_the_allowed_values() {
        let err = "Google".parse::<Company>().unwrap_err();
        assert!(err.contains("CodersData, DetaPent, MatricsTek"));
    }

    #[test]
    fn progress_follows_pipeline_stage() {
        assert_eq!(CandidateStatus::Applied.progress_percentage(), 10);
        assert_eq!(CandidateStatus::FinalRound.progress_percentage(), 75);
        assert_eq!(CandidateStatus::Rejected.progress_percentage(), 0);
    }
}
