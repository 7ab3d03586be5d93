use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::database::store::CandidateStore;
use crate::dto::stats_dto::{
    CompanyStats, DetailedStats, InterviewTypeCount, MonthlyTrend, Overview, RatingCount,
    RecruiterStats, SalesPersonStats, SalesStatsResponse, ScheduleResponse, ScheduledInterview,
    StatusCount,
};
use crate::error::{Error, Result};
use crate::models::candidate::{
    Candidate, CandidateStatus, Company, InterviewStatus, InterviewType,
};
use crate::utils::time::{day_bounds, now, parse_date, round1};

const TREND_MONTHS: u32 = 6;

fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 * 100.0 / whole as f64)
    }
}

fn average(sum: i64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        round1(sum as f64 / count as f64)
    }
}

/// Orders `(key, count)` pairs by count descending, ties by wire name.
fn by_count_desc<K: Copy>(counts: HashMap<K, i64>, name: fn(&K) -> &'static str) -> Vec<(K, i64)> {
    let mut pairs: Vec<(K, i64)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| name(&a.0).cmp(name(&b.0))));
    pairs
}

pub fn status_breakdown(candidates: &[Candidate]) -> Vec<StatusCount> {
    let mut counts: HashMap<CandidateStatus, i64> = HashMap::new();
    for c in candidates {
        *counts.entry(c.current_status).or_default() += 1;
    }
    by_count_desc(counts, CandidateStatus::as_str)
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect()
}

pub fn interview_type_breakdown(candidates: &[Candidate]) -> Vec<InterviewTypeCount> {
    let mut counts: HashMap<InterviewType, i64> = HashMap::new();
    for entry in candidates.iter().flat_map(|c| c.interview_history.iter()) {
        *counts.entry(entry.interview_type).or_default() += 1;
    }
    by_count_desc(counts, InterviewType::as_str)
        .into_iter()
        .map(|(interview_type, count)| InterviewTypeCount {
            interview_type,
            count,
        })
        .collect()
}

#[derive(Default)]
struct GroupTally {
    candidates: i64,
    interviews: i64,
    hired: i64,
    upcoming: i64,
}

fn tally_by<'a, K, F>(candidates: &'a [Candidate], now: DateTime<Utc>, key: F) -> HashMap<K, GroupTally>
where
    K: std::hash::Hash + Eq,
    F: Fn(&'a Candidate) -> K,
{
    let mut groups: HashMap<K, GroupTally> = HashMap::new();
    for c in candidates {
        let tally = groups.entry(key(c)).or_default();
        tally.candidates += 1;
        tally.interviews += c.interview_count as i64;
        if c.current_status == CandidateStatus::Hired {
            tally.hired += 1;
        }
        if c.upcoming_interview_date.is_some_and(|d| d >= now) {
            tally.upcoming += 1;
        }
    }
    groups
}

pub fn recruiter_stats(candidates: &[Candidate]) -> Vec<RecruiterStats> {
    let groups = tally_by(candidates, now(), |c| c.recruiter_name.as_str());
    let mut rows: Vec<RecruiterStats> = groups
        .into_iter()
        .map(|(name, t)| RecruiterStats {
            name: name.to_string(),
            candidate_count: t.candidates,
            avg_interviews: average(t.interviews, t.candidates),
            total_interviews: t.interviews,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.candidate_count
            .cmp(&a.candidate_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

pub fn sales_stats(candidates: &[Candidate], now: DateTime<Utc>) -> Vec<SalesPersonStats> {
    let groups = tally_by(candidates, now, |c| c.sales_person_name.as_str());
    let mut rows: Vec<SalesPersonStats> = groups
        .into_iter()
        .map(|(name, t)| SalesPersonStats {
            name: name.to_string(),
            candidate_count: t.candidates,
            interviews_completed: t.interviews,
            avg_interview_count: average(t.interviews, t.candidates),
            upcoming_interviews: t.upcoming,
            // completed interviews per candidate, as a percentage; may exceed 100
            success_rate: percent(t.interviews, t.candidates),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.candidate_count
            .cmp(&a.candidate_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

pub fn company_stats(candidates: &[Candidate]) -> Vec<CompanyStats> {
    let groups = tally_by(candidates, now(), |c| c.interviewed_company_name);
    let mut rows: Vec<CompanyStats> = groups
        .into_iter()
        .map(|(name, t): (Company, GroupTally)| CompanyStats {
            name,
            candidate_count: t.candidates,
            avg_interviews: average(t.interviews, t.candidates),
            total_interviews: t.interviews,
            hired_count: t.hired,
            success_rate: percent(t.hired, t.candidates),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.candidate_count
            .cmp(&a.candidate_count)
            .then_with(|| a.name.as_str().cmp(b.name.as_str()))
    });
    rows
}

/// Rated interview entries of any status, ascending by rating.
pub fn rating_distribution(candidates: &[Candidate]) -> Vec<RatingCount> {
    let mut counts: BTreeMap<u8, i64> = BTreeMap::new();
    for entry in candidates.iter().flat_map(|c| c.interview_history.iter()) {
        if let Some(rating) = entry.rating {
            *counts.entry(rating).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(rating, count)| RatingCount { rating, count })
        .collect()
}

/// Enrolments over the trailing six months, grouped by calendar month.
pub fn monthly_trends(candidates: &[Candidate], now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let cutoff = now
        .checked_sub_months(Months::new(TREND_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut months: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();
    for c in candidates.iter().filter(|c| c.when_enrolled >= cutoff) {
        let bucket = months
            .entry((c.when_enrolled.year(), c.when_enrolled.month()))
            .or_default();
        bucket.0 += 1;
        bucket.1 += c.interview_count as i64;
    }
    months
        .into_iter()
        .map(|((year, month), (added, conducted))| MonthlyTrend {
            year,
            month,
            candidates_added: added,
            interviews_conducted: conducted,
        })
        .collect()
}

/// Scheduled interviews falling on `date` (UTC), earliest first.
pub fn today_schedule(candidates: &[Candidate], date: NaiveDate) -> Vec<ScheduledInterview> {
    let (start, end) = day_bounds(date);
    let mut rows: Vec<ScheduledInterview> = candidates
        .iter()
        .flat_map(|c| c.interview_history.iter().map(move |entry| (c, entry)))
        .filter(|(_, entry)| {
            entry.status == InterviewStatus::Scheduled
                && entry.interview_date >= start
                && entry.interview_date < end
        })
        .map(|(c, entry)| ScheduledInterview {
            candidate_id: c.id,
            interview_id: entry.id,
            candidate_name: c.candidate_name.clone(),
            company_name: c.interviewed_company_name,
            interviewer_name: entry.interviewer_name.clone(),
            interview_type: entry.interview_type,
            interview_date: entry.interview_date,
            interview_timezone: entry.interview_timezone,
            round_number: entry.round_number,
            time: entry.interview_date.format("%H:%M").to_string(),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.interview_date
            .cmp(&b.interview_date)
            .then_with(|| a.candidate_name.cmp(&b.candidate_name))
    });
    rows
}

pub fn overview(candidates: &[Candidate]) -> Overview {
    let total_candidates = candidates.len() as i64;
    let total_interviews: i64 = candidates.iter().map(|c| c.interview_count as i64).sum();
    let hired_count = candidates
        .iter()
        .filter(|c| c.current_status == CandidateStatus::Hired)
        .count() as i64;
    let rejected_count = candidates
        .iter()
        .filter(|c| c.current_status == CandidateStatus::Rejected)
        .count() as i64;
    let pending_feedback = candidates
        .iter()
        .flat_map(|c| c.interview_history.iter())
        .filter(|i| i.status == InterviewStatus::Completed && i.feedback.is_empty())
        .count() as i64;

    Overview {
        total_candidates,
        total_interviews,
        hired_count,
        rejected_count,
        avg_interviews_per_candidate: average(total_interviews, total_candidates),
        success_rate: percent(hired_count, total_candidates),
        rejection_rate: percent(rejected_count, total_candidates),
        pending_feedback,
    }
}

pub fn detailed(candidates: &[Candidate], now: DateTime<Utc>) -> DetailedStats {
    DetailedStats {
        status_breakdown: status_breakdown(candidates),
        interview_type_stats: interview_type_breakdown(candidates),
        recruiters: recruiter_stats(candidates),
        companies: company_stats(candidates),
        rating_distribution: rating_distribution(candidates),
        monthly_trends: monthly_trends(candidates, now),
        overview: overview(candidates),
    }
}

/// Read-only aggregations over the whole candidate collection.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn CandidateStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self { store }
    }

    async fn snapshot(&self) -> Result<Vec<Candidate>> {
        self.store.all().await
    }

    pub async fn status_breakdown(&self) -> Result<Vec<StatusCount>> {
        Ok(status_breakdown(&self.snapshot().await?))
    }

    pub async fn interview_types(&self) -> Result<Vec<InterviewTypeCount>> {
        Ok(interview_type_breakdown(&self.snapshot().await?))
    }

    pub async fn recruiters(&self) -> Result<Vec<RecruiterStats>> {
        Ok(recruiter_stats(&self.snapshot().await?))
    }

    pub async fn sales(&self) -> Result<SalesStatsResponse> {
        let sales_persons = sales_stats(&self.snapshot().await?, now());
        Ok(SalesStatsResponse {
            total: sales_persons.len(),
            sales_persons,
        })
    }

    pub async fn companies(&self) -> Result<Vec<CompanyStats>> {
        Ok(company_stats(&self.snapshot().await?))
    }

    pub async fn ratings(&self) -> Result<Vec<RatingCount>> {
        Ok(rating_distribution(&self.snapshot().await?))
    }

    pub async fn monthly(&self) -> Result<Vec<MonthlyTrend>> {
        Ok(monthly_trends(&self.snapshot().await?, now()))
    }

    pub async fn overview(&self) -> Result<Overview> {
        Ok(overview(&self.snapshot().await?))
    }

    pub async fn detailed(&self) -> Result<DetailedStats> {
        Ok(detailed(&self.snapshot().await?, now()))
    }

    /// Schedule for `date` (`YYYY-MM-DD`), or for today when absent.
    pub async fn schedule(&self, date: Option<&str>) -> Result<ScheduleResponse> {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_date(raw).map_err(Error::BadRequest)?,
            None => now().date_naive(),
        };
        let interviews = today_schedule(&self.snapshot().await?, date);
        tracing::debug!(%date, count = interviews.len(), "Built interview schedule");
        Ok(ScheduleResponse {
            date,
            total: interviews.len(),
            interviews,
        })
    }
}
