use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::database::filter::{CandidateQuery, SqlArg};
use crate::database::store::{CandidatePage, CandidateStore, UniqueField};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, InterviewEntry};

const CANDIDATE_COLUMNS: &str = "id, candidate_name, candidate_email, candidate_phone_no, recruiter_name, sales_person_name, interviewed_company_name, job_description, current_status, when_enrolled, interview_count, last_date_of_interview, upcoming_interview_date, interview_by, interview_history, created_at, updated_at";

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    candidate_name: String,
    candidate_email: String,
    candidate_phone_no: String,
    recruiter_name: String,
    sales_person_name: String,
    interviewed_company_name: String,
    job_description: String,
    current_status: String,
    when_enrolled: DateTime<Utc>,
    interview_count: i32,
    last_date_of_interview: Option<DateTime<Utc>>,
    upcoming_interview_date: Option<DateTime<Utc>>,
    interview_by: String,
    interview_history: Json<Vec<InterviewEntry>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = Error;

    fn try_from(row: CandidateRow) -> Result<Self> {
        Ok(Candidate {
            id: row.id,
            candidate_name: row.candidate_name,
            candidate_email: row.candidate_email,
            candidate_phone_no: row.candidate_phone_no,
            recruiter_name: row.recruiter_name,
            sales_person_name: row.sales_person_name,
            interviewed_company_name: row
                .interviewed_company_name
                .parse()
                .map_err(Error::Internal)?,
            job_description: row.job_description,
            current_status: row.current_status.parse().map_err(Error::Internal)?,
            when_enrolled: row.when_enrolled,
            interview_count: row.interview_count,
            last_date_of_interview: row.last_date_of_interview,
            upcoming_interview_date: row.upcoming_interview_date,
            interview_by: row.interview_by,
            interview_history: row.interview_history.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_candidates(rows: Vec<CandidateRow>) -> Result<Vec<Candidate>> {
    rows.into_iter().map(Candidate::try_from).collect()
}

#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, id: Uuid) -> Result<Option<Candidate>> {
        let query = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let row = sqlx::query_as::<_, CandidateRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Candidate::try_from).transpose()
    }

    async fn insert(&self, candidate: &Candidate) -> Result<Candidate> {
        let query = format!(
            r#"
            INSERT INTO candidates (
                id, candidate_name, candidate_email, candidate_phone_no, recruiter_name,
                sales_person_name, interviewed_company_name, job_description, current_status,
                when_enrolled, interview_count, last_date_of_interview, upcoming_interview_date,
                interview_by, interview_history, created_at, updated_at
            ) VALUES (
                $1,$2,$3,$4,$5,
                $6,$7,$8,$9,
                $10,$11,$12,$13,
                $14,$15,$16,$17
            )
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, CandidateRow>(&query)
            .bind(candidate.id)
            .bind(&candidate.candidate_name)
            .bind(&candidate.candidate_email)
            .bind(&candidate.candidate_phone_no)
            .bind(&candidate.recruiter_name)
            .bind(&candidate.sales_person_name)
            .bind(candidate.interviewed_company_name.as_str())
            .bind(&candidate.job_description)
            .bind(candidate.current_status.as_str())
            .bind(candidate.when_enrolled)
            .bind(candidate.interview_count)
            .bind(candidate.last_date_of_interview)
            .bind(candidate.upcoming_interview_date)
            .bind(&candidate.interview_by)
            .bind(Json(&candidate.interview_history))
            .bind(candidate.created_at)
            .bind(candidate.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Candidate::try_from(row)
    }

    async fn update(&self, candidate: &Candidate) -> Result<Candidate> {
        let query = format!(
            r#"
            UPDATE candidates
            SET
                candidate_name = $2,
                candidate_email = $3,
                candidate_phone_no = $4,
                recruiter_name = $5,
                sales_person_name = $6,
                interviewed_company_name = $7,
                job_description = $8,
                current_status = $9,
                when_enrolled = $10,
                interview_count = $11,
                last_date_of_interview = $12,
                upcoming_interview_date = $13,
                interview_by = $14,
                interview_history = $15,
                updated_at = $16
            WHERE id = $1
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, CandidateRow>(&query)
            .bind(candidate.id)
            .bind(&candidate.candidate_name)
            .bind(&candidate.candidate_email)
            .bind(&candidate.candidate_phone_no)
            .bind(&candidate.recruiter_name)
            .bind(&candidate.sales_person_name)
            .bind(candidate.interviewed_company_name.as_str())
            .bind(&candidate.job_description)
            .bind(candidate.current_status.as_str())
            .bind(candidate.when_enrolled)
            .bind(candidate.interview_count)
            .bind(candidate.last_date_of_interview)
            .bind(candidate.upcoming_interview_date)
            .bind(&candidate.interview_by)
            .bind(Json(&candidate.interview_history))
            .bind(candidate.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Candidate::try_from(row),
            None => Err(Error::NotFound("Candidate not found".into())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_conflict(
        &self,
        email: &str,
        phone: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<UniqueField>> {
        let hits: Vec<(bool, bool)> = sqlx::query_as(
            r#"
            SELECT candidate_email = $1, candidate_phone_no = $2
            FROM candidates
            WHERE (candidate_email = $1 OR candidate_phone_no = $2)
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(email)
        .bind(phone)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        if hits.iter().any(|(email_hit, _)| *email_hit) {
            Ok(Some(UniqueField::Email))
        } else if hits.iter().any(|(_, phone_hit)| *phone_hit) {
            Ok(Some(UniqueField::Phone))
        } else {
            Ok(None)
        }
    }

    async fn list(&self, query: &CandidateQuery) -> Result<CandidatePage> {
        let (where_clause, args) = query.to_sql();

        let items_query = format!(
            "SELECT {} FROM candidates {} ORDER BY when_enrolled DESC, id LIMIT ${} OFFSET ${}",
            CANDIDATE_COLUMNS,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let total_query = format!("SELECT COUNT(*) FROM candidates {}", where_clause);

        let mut items_statement = sqlx::query_as::<_, CandidateRow>(&items_query);
        for value in &args {
            items_statement = match value {
                SqlArg::Text(v) => items_statement.bind(v),
                SqlArg::Uuid(v) => items_statement.bind(v),
                SqlArg::Int(v) => items_statement.bind(v),
                SqlArg::Timestamp(v) => items_statement.bind(v),
            };
        }
        items_statement = items_statement.bind(query.limit).bind(query.offset());
        let rows = items_statement.fetch_all(&self.pool).await?;

        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        for value in &args {
            total_statement = match value {
                SqlArg::Text(v) => total_statement.bind(v),
                SqlArg::Uuid(v) => total_statement.bind(v),
                SqlArg::Int(v) => total_statement.bind(v),
                SqlArg::Timestamp(v) => total_statement.bind(v),
            };
        }
        let total = total_statement.fetch_one(&self.pool).await?;

        Ok(CandidatePage {
            items: into_candidates(rows)?,
            total,
        })
    }

    async fn all(&self) -> Result<Vec<Candidate>> {
        let query = format!(
            "SELECT {} FROM candidates ORDER BY when_enrolled DESC, id",
            CANDIDATE_COLUMNS
        );
        let rows = sqlx::query_as::<_, CandidateRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        into_candidates(rows)
    }
}
