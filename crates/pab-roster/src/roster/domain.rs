use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier number of a member, used verbatim as the `users` document key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The three independent PAB gate checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestones {
    pub interview: bool,
    pub physical: bool,
    pub training: bool,
}

impl Milestones {
    pub const fn all() -> Self {
        Self {
            interview: true,
            physical: true,
            training: true,
        }
    }
}

/// One persisted document in the `users` collection.
///
/// Every field besides `id` defaults on read so older documents without
/// counters or milestones still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub committee_count: u32,
    #[serde(default)]
    pub meeting_count: u32,
    /// Manually edited total. Never reconciled with the derived score.
    #[serde(default)]
    pub active_points: i64,
    #[serde(default)]
    pub milestones: Milestones,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_queued_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Fresh record as produced by a roster import.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        faculty: impl Into<String>,
        contact_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            faculty: faculty.into(),
            contact_number: contact_number.into(),
            committee_count: 0,
            meeting_count: 0,
            active_points: 0,
            milestones: Milestones::default(),
            physical_score: None,
            physical_notes: None,
            interview_queued_at: None,
        }
    }

    /// Overwrites exactly the fields present in the patch.
    pub fn apply(&mut self, patch: &MemberPatch) {
        if let Some(milestones) = patch.milestones {
            self.milestones = milestones;
        }
        if let Some(count) = patch.committee_count {
            self.committee_count = count;
        }
        if let Some(count) = patch.meeting_count {
            self.meeting_count = count;
        }
        if let Some(points) = patch.active_points {
            self.active_points = points;
        }
        if let Some(score) = patch.physical_score {
            self.physical_score = Some(score);
        }
        if let Some(notes) = &patch.physical_notes {
            self.physical_notes = Some(notes.clone());
        }
        if let Some(queued_at) = patch.interview_queued_at {
            self.interview_queued_at = Some(queued_at);
        }
    }

    pub fn is_awaiting_interview(&self) -> bool {
        self.interview_queued_at.is_some() && !self.milestones.interview
    }
}

/// Partial update sent to the store. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Milestones>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_queued_at: Option<DateTime<Utc>>,
}

impl MemberPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
