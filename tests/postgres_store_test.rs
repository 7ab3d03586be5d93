use std::env;

use candidate_tracker::{
    config::{Config, LogFormat, StoreBackend},
    database::{
        filter::CandidateQuery, pool::create_pool, postgres::PgCandidateStore,
        store::{CandidateStore, UniqueField},
    },
    dto::candidate_dto::ListCandidatesQuery,
    error::Error,
    models::candidate::{
        Candidate, CandidateStatus, Company, InterviewEntry, InterviewStatus, InterviewType,
        Timezone,
    },
    services::derivation,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

async fn setup_store() -> PgCandidateStore {
    dotenvy::dotenv().ok();
    let config = Config {
        server_address: "127.0.0.1:0".into(),
        store_backend: StoreBackend::Postgres,
        database_url: Some(env::var("DATABASE_URL").expect("DATABASE_URL")),
        database_max_connections: 2,
        log_format: LogFormat::Pretty,
    };
    let pool = create_pool(&config).await.expect("pool");
    let store = PgCandidateStore::new(pool);
    store.migrate().await.expect("migrations");
    store
}

fn sample_candidate() -> Candidate {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(12)
        .collect();
    let now = Utc::now();
    let mut candidate = Candidate {
        id: Uuid::new_v4(),
        candidate_name: format!("Pg Candidate {suffix}"),
        candidate_email: format!("pg-{suffix}@example.com"),
        candidate_phone_no: digits,
        recruiter_name: "Meera".into(),
        sales_person_name: "Kiran".into(),
        interviewed_company_name: Company::DetaPent,
        job_description: "Backend engineer".into(),
        current_status: CandidateStatus::Interview,
        when_enrolled: now,
        interview_count: 0,
        last_date_of_interview: None,
        upcoming_interview_date: None,
        interview_by: String::new(),
        interview_history: vec![
            InterviewEntry {
                id: Uuid::new_v4(),
                interview_date: now - Duration::days(3),
                interview_time: "10:00".into(),
                interview_timezone: Timezone::Pst,
                interviewer_name: "Ravi".into(),
                interview_type: InterviewType::Technical,
                status: InterviewStatus::Completed,
                feedback: "Solid".into(),
                rating: Some(4),
                round_number: 0,
            },
            InterviewEntry {
                id: Uuid::new_v4(),
                interview_date: now + Duration::days(3),
                interview_time: String::new(),
                interview_timezone: Timezone::Ist,
                interviewer_name: "Nina".into(),
                interview_type: InterviewType::Final,
                status: InterviewStatus::Scheduled,
                feedback: String::new(),
                rating: None,
                round_number: 0,
            },
        ],
        created_at: now,
        updated_at: now,
    };
    derivation::refresh(&mut candidate, now);
    candidate
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn candidate_round_trips_through_postgres() {
    let store = setup_store().await;
    let candidate = sample_candidate();

    let inserted = store.insert(&candidate).await.expect("insert");
    assert_eq!(inserted.interview_history, candidate.interview_history);
    assert_eq!(inserted.interview_count, 1);

    let params = ListCandidatesQuery {
        search: Some(candidate.candidate_email.clone()),
        filter: Some("one_interview".into()),
        ..Default::default()
    };
    let query = CandidateQuery::from_params(&params, Utc::now()).expect("query");
    let page = store.list(&query).await.expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, candidate.id);

    let conflict = store
        .find_conflict("someone-else@example.com", &candidate.candidate_phone_no, None)
        .await
        .expect("conflict lookup");
    assert_eq!(conflict, Some(UniqueField::Phone));

    let mut duplicate = sample_candidate();
    duplicate.candidate_email = candidate.candidate_email.clone();
    match store.insert(&duplicate).await {
        Err(Error::Conflict { field, .. }) => assert_eq!(field, "candidate_email"),
        other => panic!("expected conflict, got {other:?}"),
    }

    assert!(store.delete(candidate.id).await.expect("delete"));
    assert!(store.get(candidate.id).await.expect("get").is_none());
}
