use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::filter::CandidateQuery;
use crate::database::store::{CandidatePage, CandidateStore, UniqueField};
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;

/// In-process candidate store with the same uniqueness rules as the
/// Postgres schema. Used by tests and by `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryCandidateStore {
    candidates: RwLock<HashMap<Uuid, Candidate>>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict_in<'a>(
    candidates: impl Iterator<Item = &'a Candidate>,
    email: &str,
    phone: &str,
    exclude: Option<Uuid>,
) -> Option<UniqueField> {
    let mut phone_hit = false;
    for c in candidates {
        if Some(c.id) == exclude {
            continue;
        }
        if c.candidate_email == email {
            return Some(UniqueField::Email);
        }
        if c.candidate_phone_no == phone {
            phone_hit = true;
        }
    }
    phone_hit.then_some(UniqueField::Phone)
}

fn newest_first(items: &mut [Candidate]) {
    items.sort_by(|a, b| b.when_enrolled.cmp(&a.when_enrolled).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, id: Uuid) -> Result<Option<Candidate>> {
        Ok(self.candidates.read().await.get(&id).cloned())
    }

    async fn insert(&self, candidate: &Candidate) -> Result<Candidate> {
        let mut guard = self.candidates.write().await;
        if let Some(field) = conflict_in(
            guard.values(),
            &candidate.candidate_email,
            &candidate.candidate_phone_no,
            None,
        ) {
            return Err(Error::duplicate(field));
        }
        if guard.contains_key(&candidate.id) {
            return Err(Error::Internal(format!(
                "Candidate id {} already present",
                candidate.id
            )));
        }
        guard.insert(candidate.id, candidate.clone());
        Ok(candidate.clone())
    }

    async fn update(&self, candidate: &Candidate) -> Result<Candidate> {
        let mut guard = self.candidates.write().await;
        if !guard.contains_key(&candidate.id) {
            return Err(Error::NotFound("Candidate not found".into()));
        }
        if let Some(field) = conflict_in(
            guard.values(),
            &candidate.candidate_email,
            &candidate.candidate_phone_no,
            Some(candidate.id),
        ) {
            return Err(Error::duplicate(field));
        }
        guard.insert(candidate.id, candidate.clone());
        Ok(candidate.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.candidates.write().await.remove(&id).is_some())
    }

    async fn find_conflict(
        &self,
        email: &str,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<UniqueField>> {
        let guard = self.candidates.read().await;
        Ok(conflict_in(guard.values(), email, phone, exclude))
    }

    async fn list(&self, query: &CandidateQuery) -> Result<CandidatePage> {
        let guard = self.candidates.read().await;
        let mut matched: Vec<Candidate> = guard
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        newest_first(&mut matched);

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .collect();
        Ok(CandidatePage { items, total })
    }

    async fn all(&self) -> Result<Vec<Candidate>> {
        let mut items: Vec<Candidate> = self.candidates.read().await.values().cloned().collect();
        newest_first(&mut items);
        Ok(items)
    }
}
