use super::domain::{Member, MemberId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One member waiting to be called for interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    /// 1-based position; position 1 is called next.
    pub position: usize,
    pub is_next: bool,
    pub id: MemberId,
    pub name: String,
    pub faculty: String,
    pub queued_at: DateTime<Utc>,
    /// Floored minutes since enqueue, computed at read time.
    pub wait_minutes: i64,
}

/// Members queued for interview who have not passed it yet, earliest first.
///
/// The timestamp is kept after the interview is marked done; the member only
/// drops out because of the milestone flag.
pub fn pending_interviews(members: &[Member], now: DateTime<Utc>) -> Vec<QueueEntry> {
    let mut waiting: Vec<(&Member, DateTime<Utc>)> = members
        .iter()
        .filter(|member| !member.milestones.interview)
        .filter_map(|member| member.interview_queued_at.map(|at| (member, at)))
        .collect();

    waiting.sort_by_key(|(_, queued_at)| *queued_at);

    waiting
        .into_iter()
        .enumerate()
        .map(|(index, (member, queued_at))| QueueEntry {
            position: index + 1,
            is_next: index == 0,
            id: member.id.clone(),
            name: member.name.clone(),
            faculty: member.faculty.clone(),
            queued_at,
            wait_minutes: (now - queued_at).num_minutes(),
        })
        .collect()
}
