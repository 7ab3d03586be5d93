use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::database::filter::CandidateQuery;
use crate::database::store::CandidateStore;
use crate::dto::candidate_dto::{
    CreateCandidatePayload, InterviewEntryPayload, ListCandidatesQuery, UpdateCandidatePayload,
    UpdateInterviewPayload,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, InterviewEntry};
use crate::services::derivation;
use crate::utils::time::now;

/// Builds a history from submitted rounds; a repeated entry id is replaced
/// with a fresh one so every round stays individually addressable.
fn history_from(rounds: Vec<InterviewEntryPayload>) -> Vec<InterviewEntry> {
    let mut seen = HashSet::new();
    rounds
        .into_iter()
        .map(|round| {
            let mut entry = round.into_entry();
            if !seen.insert(entry.id) {
                entry.id = Uuid::new_v4();
                seen.insert(entry.id);
            }
            entry
        })
        .collect()
}

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn CandidateStore>,
}

pub struct CandidateList {
    pub items: Vec<Candidate>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl CandidateService {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, params: &ListCandidatesQuery) -> Result<CandidateList> {
        let query = CandidateQuery::from_params(params, now())?;
        let page = self.store.list(&query).await?;
        Ok(CandidateList {
            items: page.items,
            total: page.total,
            page: query.page,
            limit: query.limit,
        })
    }

    pub async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".into()))
    }

    pub async fn create_candidate(&self, mut payload: CreateCandidatePayload) -> Result<Candidate> {
        payload.normalize();
        payload.validate()?;

        self.ensure_unique(&payload.candidate_email, &payload.candidate_phone_no, None)
            .await?;

        let timestamp = now();
        let mut candidate = Candidate {
            id: Uuid::new_v4(),
            candidate_name: payload.candidate_name,
            candidate_email: payload.candidate_email,
            candidate_phone_no: payload.candidate_phone_no,
            recruiter_name: payload.recruiter_name,
            sales_person_name: payload.sales_person_name,
            interviewed_company_name: payload.interviewed_company_name,
            job_description: payload.job_description,
            current_status: payload.current_status.unwrap_or_default(),
            when_enrolled: payload.when_enrolled.unwrap_or(timestamp),
            interview_count: 0,
            last_date_of_interview: None,
            upcoming_interview_date: None,
            interview_by: String::new(),
            interview_history: history_from(payload.interview_history),
            created_at: timestamp,
            updated_at: timestamp,
        };
        derivation::refresh(&mut candidate, timestamp);

        let created = self.store.insert(&candidate).await?;
        tracing::info!(candidate_id = %created.id, "Candidate created");
        Ok(created)
    }

    pub async fn update_candidate(
        &self,
        id: Uuid,
        mut payload: UpdateCandidatePayload,
    ) -> Result<Candidate> {
        payload.normalize();
        payload.validate()?;

        let mut candidate = self.get_candidate(id).await?;

        if let Some(v) = payload.candidate_name {
            candidate.candidate_name = v;
        }
        if let Some(v) = payload.candidate_email {
            candidate.candidate_email = v;
        }
        if let Some(v) = payload.candidate_phone_no {
            candidate.candidate_phone_no = v;
        }
        if let Some(v) = payload.recruiter_name {
            candidate.recruiter_name = v;
        }
        if let Some(v) = payload.sales_person_name {
            candidate.sales_person_name = v;
        }
        if let Some(v) = payload.interviewed_company_name {
            candidate.interviewed_company_name = v;
        }
        if let Some(v) = payload.job_description {
            candidate.job_description = v;
        }
        if let Some(v) = payload.current_status {
            candidate.current_status = v;
        }
        if let Some(v) = payload.when_enrolled {
            candidate.when_enrolled = v;
        }
        if let Some(history) = payload.interview_history {
            candidate.interview_history = history_from(history);
        }

        self.ensure_unique(
            &candidate.candidate_email,
            &candidate.candidate_phone_no,
            Some(id),
        )
        .await?;

        let updated = self.save(candidate).await?;
        tracing::info!(candidate_id = %id, "Candidate updated");
        Ok(updated)
    }

    pub async fn delete_candidate(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(Error::NotFound("Candidate not found".into()));
        }
        tracing::info!(candidate_id = %id, "Candidate deleted");
        Ok(())
    }

    pub async fn add_interview(
        &self,
        id: Uuid,
        mut payload: InterviewEntryPayload,
    ) -> Result<Candidate> {
        payload.normalize();
        payload.validate()?;

        let mut candidate = self.get_candidate(id).await?;
        let mut entry = payload.into_entry();
        if candidate.interview(entry.id).is_some() {
            entry.id = Uuid::new_v4();
        }
        if entry.round_number == 0 {
            entry.round_number = candidate.interview_history.len() as u32 + 1;
        }
        let interview_id = entry.id;
        candidate.interview_history.push(entry);

        let updated = self.save(candidate).await?;
        tracing::info!(candidate_id = %id, interview_id = %interview_id, "Interview added");
        Ok(updated)
    }

    pub async fn update_interview(
        &self,
        id: Uuid,
        interview_id: Uuid,
        mut payload: UpdateInterviewPayload,
    ) -> Result<Candidate> {
        payload.normalize();
        payload.validate()?;

        let mut candidate = self.get_candidate(id).await?;
        let entry = candidate
            .interview_mut(interview_id)
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        payload.apply(entry);

        let updated = self.save(candidate).await?;
        tracing::info!(candidate_id = %id, interview_id = %interview_id, "Interview updated");
        Ok(updated)
    }

    pub async fn remove_interview(&self, id: Uuid, interview_id: Uuid) -> Result<Candidate> {
        let mut candidate = self.get_candidate(id).await?;
        let before = candidate.interview_history.len();
        candidate.interview_history.retain(|i| i.id != interview_id);
        if candidate.interview_history.len() == before {
            return Err(Error::NotFound("Interview not found".into()));
        }

        let updated = self.save(candidate).await?;
        tracing::info!(candidate_id = %id, interview_id = %interview_id, "Interview removed");
        Ok(updated)
    }

    async fn ensure_unique(&self, email: &str, phone: &str, exclude: Option<Uuid>) -> Result<()> {
        if let Some(field) = self.store.find_conflict(email, phone, exclude).await? {
            tracing::warn!(field = field.column(), "Rejected duplicate candidate");
            return Err(Error::duplicate(field));
        }
        Ok(())
    }

    /// Re-derives summary fields and writes the whole document back.
    async fn save(&self, mut candidate: Candidate) -> Result<Candidate> {
        let timestamp = now();
        derivation::refresh(&mut candidate, timestamp);
        candidate.updated_at = timestamp;
        self.store.update(&candidate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::{MockCandidateStore, UniqueField};
    use crate::models::candidate::{Company, InterviewStatus};
    use serde_json::json;

    fn create_payload() -> CreateCandidatePayload {
        serde_json::from_value(json!({
            "candidate_name": "Dev Patel",
            "candidate_email": "DEV@example.com",
            "candidate_phone_no": "9123456780",
            "recruiter_name": "Meera",
            "sales_person_name": "Kiran",
            "interviewed_company_name": "CodersData",
            "interview_history": [
                { "interview_date": "2024-01-10T10:00:00Z", "interviewer_name": "Ravi", "interview_type": "Phone", "status": "Completed" },
                { "interview_date": "2024-01-10T15:00:00Z", "interviewer_name": "Ravi", "interview_type": "Video", "status": "Completed" },
                { "interview_date": "2099-01-01T09:00:00Z", "interviewer_name": "Nina", "interview_type": "Technical", "status": "Scheduled" }
            ]
        }))
        .unwrap()
    }

    fn service(store: MockCandidateStore) -> CandidateService {
        CandidateService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn create_derives_summary_fields_before_insert() {
        let mut store = MockCandidateStore::new();
        store
            .expect_find_conflict()
            .withf(|email, phone, exclude| {
                email.to_string() == "dev@example.com"
                    && phone.to_string() == "9123456780"
                    && exclude.is_none()
            })
            .returning(|_, _, _| Ok(None));
        store
            .expect_insert()
            .withf(|c| c.interview_count == 2 && c.interview_by == "Ravi")
            .times(1)
            .returning(|c| Ok(c.clone()));

        let created = service(store).create_candidate(create_payload()).await.unwrap();
        assert_eq!(created.interview_count, 2);
        assert_eq!(created.interviewed_company_name, Company::CodersData);
        assert_eq!(
            created.last_date_of_interview.unwrap().to_rfc3339(),
            "2024-01-10T15:00:00+00:00"
        );
        assert_eq!(
            created.upcoming_interview_date.unwrap().to_rfc3339(),
            "2099-01-01T09:00:00+00:00"
        );
        let rounds: Vec<u32> = created.interview_history.iter().map(|i| i.round_number).collect();
        assert_eq!(rounds, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_phone_is_attributed_and_nothing_is_written() {
        let mut store = MockCandidateStore::new();
        store
            .expect_find_conflict()
            .returning(|_, _, _| Ok(Some(UniqueField::Phone)));
        store.expect_insert().never();

        let err = service(store).create_candidate(create_payload()).await.unwrap_err();
        match err {
            Error::Conflict { field, .. } => assert_eq!(field, "candidate_phone_no"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_the_store() {
        let mut payload = create_payload();
        payload.candidate_phone_no = "12345".into();
        let store = MockCandidateStore::new();
        let err = service(store).create_candidate(payload).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_a_missing_candidate_is_not_found() {
        let mut store = MockCandidateStore::new();
        store.expect_delete().returning(|_| Ok(false));
        let err = service(store).delete_candidate(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn completing_an_interview_updates_the_count() {
        let existing = {
            let mut store = MockCandidateStore::new();
            store.expect_find_conflict().returning(|_, _, _| Ok(None));
            store.expect_insert().returning(|c| Ok(c.clone()));
            service(store).create_candidate(create_payload()).await.unwrap()
        };
        let scheduled_id = existing.interview_history[2].id;
        let candidate_id = existing.id;

        let mut store = MockCandidateStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_update().returning(|c| Ok(c.clone()));

        let patch = UpdateInterviewPayload {
            status: Some(InterviewStatus::Completed),
            rating: Some(5),
            ..Default::default()
        };
        let updated = service(store)
            .update_interview(candidate_id, scheduled_id, patch)
            .await
            .unwrap();
        assert_eq!(updated.interview_count, 3);
        assert_eq!(updated.upcoming_interview_date, None);
        assert_eq!(updated.interview_history[2].rating, Some(5));
    }

    #[tokio::test]
    async fn repeated_interview_ids_are_given_fresh_ids() {
        let shared = Uuid::new_v4();
        let mut payload = create_payload();
        payload.interview_history[0].id = Some(shared);
        payload.interview_history[1].id = Some(shared);

        let mut store = MockCandidateStore::new();
        store.expect_find_conflict().returning(|_, _, _| Ok(None));
        store.expect_insert().returning(|c| Ok(c.clone()));
        let created = service(store).create_candidate(payload).await.unwrap();

        let history = &created.interview_history;
        assert_eq!(history[0].id, shared);
        assert_ne!(history[1].id, shared);
        assert_ne!(history[1].id, history[2].id);
    }

    #[tokio::test]
    async fn padded_interview_time_is_accepted_on_update() {
        let existing = {
            let mut store = MockCandidateStore::new();
            store.expect_find_conflict().returning(|_, _, _| Ok(None));
            store.expect_insert().returning(|c| Ok(c.clone()));
            service(store).create_candidate(create_payload()).await.unwrap()
        };
        let interview_id = existing.interview_history[0].id;
        let candidate_id = existing.id;

        let mut store = MockCandidateStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_update().returning(|c| Ok(c.clone()));

        let patch = UpdateInterviewPayload {
            interview_time: Some(" 10:00".into()),
            ..Default::default()
        };
        let updated = service(store)
            .update_interview(candidate_id, interview_id, patch)
            .await
            .unwrap();
        assert_eq!(updated.interview_history[0].interview_time, "10:00");
    }

    #[tokio::test]
    async fn removing_an_unknown_interview_is_not_found() {
        let candidate = {
            let mut store = MockCandidateStore::new();
            store.expect_find_conflict().returning(|_, _, _| Ok(None));
            store.expect_insert().returning(|c| Ok(c.clone()));
            service(store).create_candidate(create_payload()).await.unwrap()
        };

        let mut store = MockCandidateStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(candidate.clone())));
        store.expect_update().never();

        let err = service(store)
            .remove_interview(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
