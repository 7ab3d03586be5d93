use async_trait::async_trait;
use uuid::Uuid;

use crate::database::filter::CandidateQuery;
use crate::error::Result;
use crate::models::candidate::Candidate;

/// Candidate columns that carry a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
}

impl UniqueField {
    pub fn column(&self) -> &'static str {
        match self {
            UniqueField::Email => "candidate_email",
            UniqueField::Phone => "candidate_phone_no",
        }
    }

    pub fn conflict_message(&self) -> &'static str {
        match self {
            UniqueField::Email => "A candidate with this email address already exists.",
            UniqueField::Phone => "A candidate with this phone number already exists.",
        }
    }

    /// Maps a Postgres unique constraint name back to the field it guards.
    /// The compound (email, phone) key can only trip when the email one does,
    /// so it is reported as an email conflict.
    pub fn from_constraint(name: Option<&str>) -> Option<Self> {
        match name? {
            "candidates_email_key" | "candidates_email_phone_key" => Some(UniqueField::Email),
            "candidates_phone_key" => Some(UniqueField::Phone),
            _ => None,
        }
    }
}

pub struct CandidatePage {
    pub items: Vec<Candidate>,
    pub total: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, id: Uuid) -> Result<Option<Candidate>>;

    /// Persists a new candidate. Fails with `Error::Conflict` when the email
    /// or phone is already taken.
    async fn insert(&self, candidate: &Candidate) -> Result<Candidate>;

    /// Replaces the stored document with `candidate`. `Error::NotFound` when
    /// the id no longer exists.
    async fn update(&self, candidate: &Candidate) -> Result<Candidate>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// First unique field already held by a candidate other than `exclude`.
    async fn find_conflict(
        &self,
        email: &str,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<UniqueField>>;

    async fn list(&self, query: &CandidateQuery) -> Result<CandidatePage>;

    /// Whole collection, for reports.
    async fn all(&self) -> Result<Vec<Candidate>>;
}
