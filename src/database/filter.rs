//! Translates list parameters into a backend-neutral candidate query.

use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;
use uuid::Uuid;

use crate::dto::candidate_dto::ListCandidatesQuery;
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::utils::time::{day_bounds, parse_date};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterviewFilter {
    #[default]
    All,
    NotConducted,
    OneInterview,
    TwoInterviews,
    ThreePlus,
    Upcoming,
}

impl FromStr for InterviewFilter {
    type Err = std::convert::Infallible;

    /// Unknown keywords mean "no filter".
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "not_conducted" => InterviewFilter::NotConducted,
            "one_interview" => InterviewFilter::OneInterview,
            "two_interviews" => InterviewFilter::TwoInterviews,
            "three_plus" => InterviewFilter::ThreePlus,
            "upcoming" => InterviewFilter::Upcoming,
            _ => InterviewFilter::All,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    Exactly(i32),
    AtLeast(i32),
}

impl CountFilter {
    pub fn matches(&self, count: i32) -> bool {
        match *self {
            CountFilter::Exactly(n) => count == n,
            CountFilter::AtLeast(n) => count >= n,
        }
    }
}

/// Bound on `upcoming_interview_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpcomingFilter {
    From(DateTime<Utc>),
    Between(DateTime<Utc>, DateTime<Utc>),
}

impl UpcomingFilter {
    pub fn matches(&self, date: Option<DateTime<Utc>>) -> bool {
        match (*self, date) {
            (_, None) => false,
            (UpcomingFilter::From(start), Some(d)) => d >= start,
            (UpcomingFilter::Between(start, end), Some(d)) => d >= start && d < end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub search: Option<String>,
    pub search_id: Option<Uuid>,
    pub count: Option<CountFilter>,
    pub upcoming: Option<UpcomingFilter>,
    pub page: i64,
    pub limit: i64,
}

fn page_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl CandidateQuery {
    pub fn from_params(params: &ListCandidatesQuery, now: DateTime<Utc>) -> Result<Self> {
        let page = page_param(params.page.as_deref(), DEFAULT_PAGE);
        let limit = page_param(params.limit.as_deref(), DEFAULT_LIMIT).min(MAX_LIMIT);

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let search_id = search.as_deref().and_then(|s| Uuid::parse_str(s).ok());

        let keyword = params
            .filter
            .as_deref()
            .map(|f| f.parse::<InterviewFilter>().unwrap_or_default())
            .unwrap_or_default();

        let (count, mut upcoming) = match keyword {
            InterviewFilter::All => (None, None),
            InterviewFilter::NotConducted => (Some(CountFilter::Exactly(0)), None),
            InterviewFilter::OneInterview => (Some(CountFilter::Exactly(1)), None),
            InterviewFilter::TwoInterviews => (Some(CountFilter::Exactly(2)), None),
            InterviewFilter::ThreePlus => (Some(CountFilter::AtLeast(3)), None),
            InterviewFilter::Upcoming => (None, Some(UpcomingFilter::From(now))),
        };

        if let Some(raw) = params.upcoming_date.as_deref().filter(|d| !d.trim().is_empty()) {
            let date: NaiveDate = parse_date(raw).map_err(Error::BadRequest)?;
            let (start, end) = day_bounds(date);
            upcoming = Some(UpcomingFilter::Between(start, end));
        }

        Ok(Self {
            search,
            search_id,
            count,
            upcoming,
            page,
            limit,
        })
    }

    /// Rows to skip; saturates so absurd page numbers yield an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// In-process evaluation, used by the memory store.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let text_hit = [
                &candidate.candidate_name,
                &candidate.candidate_email,
                &candidate.sales_person_name,
                &candidate.recruiter_name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            let id_hit = self.search_id == Some(candidate.id);
            if !(text_hit || id_hit) {
                return false;
            }
        }
        if let Some(count) = self.count {
            if !count.matches(candidate.interview_count) {
                return false;
            }
        }
        if let Some(upcoming) = self.upcoming {
            if !upcoming.matches(candidate.upcoming_interview_date) {
                return false;
            }
        }
        true
    }

    /// Renders the `WHERE` clause for Postgres. Placeholders are numbered
    /// from `$1` in the order of the returned arguments.
    pub fn to_sql(&self) -> (String, Vec<SqlArg>) {
        let mut filters = Vec::new();
        let mut args: Vec<SqlArg> = Vec::new();

        if let Some(term) = &self.search {
            args.push(SqlArg::Text(format!("%{}%", escape_like(term))));
            let p = args.len();
            let mut clause = format!(
                "(candidate_name ILIKE ${p} OR candidate_email ILIKE ${p} OR sales_person_name ILIKE ${p} OR recruiter_name ILIKE ${p}"
            );
            if let Some(id) = self.search_id {
                args.push(SqlArg::Uuid(id));
                clause.push_str(&format!(" OR id = ${}", args.len()));
            }
            clause.push(')');
            filters.push(clause);
        }

        match self.count {
            Some(CountFilter::Exactly(n)) => {
                args.push(SqlArg::Int(n));
                filters.push(format!("interview_count = ${}", args.len()));
            }
            Some(CountFilter::AtLeast(n)) => {
                args.push(SqlArg::Int(n));
                filters.push(format!("interview_count >= ${}", args.len()));
            }
            None => {}
        }

        match self.upcoming {
            Some(UpcomingFilter::From(start)) => {
                args.push(SqlArg::Timestamp(start));
                filters.push(format!("upcoming_interview_date >= ${}", args.len()));
            }
            Some(UpcomingFilter::Between(start, end)) => {
                args.push(SqlArg::Timestamp(start));
                args.push(SqlArg::Timestamp(end));
                filters.push(format!(
                    "upcoming_interview_date >= ${} AND upcoming_interview_date < ${}",
                    args.len() - 1,
                    args.len()
                ));
            }
            None => {}
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        (where_clause, args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Text(String),
    Uuid(Uuid),
    Int(i32),
    Timestamp(DateTime<Utc>),
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> ListCandidatesQuery {
        let mut q = ListCandidatesQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => q.page = v,
                "limit" => q.limit = v,
                "search" => q.search = v,
                "filter" => q.filter = v,
                "upcoming_date" => q.upcoming_date = v,
                _ => unreachable!(),
            }
        }
        q
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn bad_page_and_limit_fall_back_to_defaults() {
        let q = CandidateQuery::from_params(&params(&[("page", "zero"), ("limit", "-5")]), now())
            .unwrap();
        assert_eq!((q.page, q.limit), (1, 10));
        assert_eq!(q.offset(), 0);

        let q = CandidateQuery::from_params(&params(&[("page", "3"), ("limit", "25")]), now())
            .unwrap();
        assert_eq!(q.offset(), 50);

        let q = CandidateQuery::from_params(&params(&[("limit", "999999")]), now()).unwrap();
        assert_eq!(q.limit, MAX_LIMIT);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let q = CandidateQuery::from_params(
            &params(&[("page", "9223372036854775807"), ("limit", "10")]),
            now(),
        )
        .unwrap();
        assert_eq!(q.page, i64::MAX);
        assert_eq!(q.offset(), i64::MAX);

        let q = CandidateQuery::from_params(&params(&[("page", "99999999999999999999")]), now())
            .unwrap();
        assert_eq!(q.page, DEFAULT_PAGE);
    }

    #[test]
    fn keywords_map_to_count_and_upcoming_filters() {
        let q = CandidateQuery::from_params(&params(&[("filter", "three_plus")]), now()).unwrap();
        assert_eq!(q.count, Some(CountFilter::AtLeast(3)));
        let q = CandidateQuery::from_params(&params(&[("filter", "not_conducted")]), now()).unwrap();
        assert_eq!(q.count, Some(CountFilter::Exactly(0)));
        let q = CandidateQuery::from_params(&params(&[("filter", "upcoming")]), now()).unwrap();
        assert_eq!(q.upcoming, Some(UpcomingFilter::From(now())));
        let q = CandidateQuery::from_params(&params(&[("filter", "bogus")]), now()).unwrap();
        assert_eq!((q.count, q.upcoming), (None, None));
    }

    #[test]
    fn upcoming_date_selects_one_day() {
        let q = CandidateQuery::from_params(
            &params(&[("filter", "upcoming"), ("upcoming_date", "2025-06-03")]),
            now(),
        )
        .unwrap();
        let start = Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap();
        assert_eq!(q.upcoming, Some(UpcomingFilter::Between(start, end)));
        let f = q.upcoming.unwrap();
        assert!(f.matches(Some(start)));
        assert!(!f.matches(Some(end)));
        assert!(!f.matches(None));
    }

    #[test]
    fn malformed_upcoming_date_is_rejected() {
        let err = CandidateQuery::from_params(&params(&[("upcoming_date", "June 3rd")]), now())
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn search_detects_ids() {
        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let q = CandidateQuery::from_params(&params(&[("search", id_text.as_str())]), now()).unwrap();
        assert_eq!(q.search_id, Some(id));
        let q = CandidateQuery::from_params(&params(&[("search", "  ")]), now()).unwrap();
        assert_eq!(q.search, None);
    }

    #[test]
    fn sql_clause_numbers_placeholders_in_order() {
        let id = Uuid::new_v4();
        let q = CandidateQuery {
            search: Some(id.to_string()),
            search_id: Some(id),
            count: Some(CountFilter::Exactly(2)),
            upcoming: Some(UpcomingFilter::Between(now(), now())),
            page: 1,
            limit: 10,
        };
        let (sql, args) = q.to_sql();
        assert!(sql.starts_with("WHERE (candidate_name ILIKE $1"));
        assert!(sql.contains("OR id = $2)"));
        assert!(sql.contains("interview_count = $3"));
        assert!(sql.contains("upcoming_interview_date >= $4 AND upcoming_interview_date < $5"));
        assert_eq!(args.len(), 5);
        assert_eq!(args[2], SqlArg::Int(2));
    }

    #[test]
    fn empty_query_has_no_where_clause() {
        let q = CandidateQuery::from_params(&ListCandidatesQuery::default(), now()).unwrap();
        let (sql, args) = q.to_sql();
        assert_eq!(sql, "");
        assert!(args.is_empty());
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
