//! Summary fields computed from a candidate's interview history.
//!
//! These run before every write; nothing a client sends for them is kept.

use chrono::{DateTime, Utc};

use crate::models::candidate::{Candidate, InterviewEntry, InterviewStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedFields {
    pub interview_count: i32,
    pub last_date_of_interview: Option<DateTime<Utc>>,
    pub upcoming_interview_date: Option<DateTime<Utc>>,
    pub interview_by: String,
}

pub fn derive(history: &[InterviewEntry], now: DateTime<Utc>) -> DerivedFields {
    let completed = history
        .iter()
        .filter(|i| i.status == InterviewStatus::Completed);

    let interview_count = completed.clone().count() as i32;
    let last_date_of_interview = completed.map(|i| i.interview_date).max();

    let upcoming_interview_date = history
        .iter()
        .filter(|i| i.status == InterviewStatus::Scheduled && i.interview_date > now)
        .map(|i| i.interview_date)
        .min();

    DerivedFields {
        interview_count,
        last_date_of_interview,
        upcoming_interview_date,
        interview_by: primary_interviewer(history),
    }
}

/// Most frequent interviewer; on a tie the name seen first wins.
fn primary_interviewer(history: &[InterviewEntry]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in history {
        let name = entry.interviewer_name.as_str();
        if name.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string()).unwrap_or_default()
}

/// Fills missing (zero) round numbers with the entry's 1-based position.
pub fn assign_round_numbers(history: &mut [InterviewEntry]) {
    for (index, entry) in history.iter_mut().enumerate() {
        if entry.round_number == 0 {
            entry.round_number = index as u32 + 1;
        }
    }
}

/// Recomputes every derived field on `candidate` in place.
pub fn refresh(candidate: &mut Candidate, now: DateTime<Utc>) {
    assign_round_numbers(&mut candidate.interview_history);
    let derived = derive(&candidate.interview_history, now);
    candidate.interview_count = derived.interview_count;
    candidate.last_date_of_interview = derived.last_date_of_interview;
    candidate.upcoming_interview_date = derived.upcoming_interview_date;
    candidate.interview_by = derived.interview_by;
}
