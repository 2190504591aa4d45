use super::domain::{Member, MemberId, Milestones};
use super::pipeline::RosterView;
use super::scoring::{
    classify, classify_eligibility, completed_milestones, completion_percent, is_athlete_potential,
    physical_tier, total_points, CategoryTally, EligibilityCategory, PhysicalTier, PointsCategory,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A member as rendered by the views: stored fields plus derived scores.
///
/// `active_points` is the manually edited figure and `total_points` the derived
/// one; the two are reported side by side and may disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    pub id: MemberId,
    pub name: String,
    pub faculty: String,
    pub contact_number: String,
    pub committee_count: u32,
    pub meeting_count: u32,
    pub active_points: i64,
    pub total_points: i64,
    pub points_category: PointsCategory,
    pub points_label: &'static str,
    pub milestones: Milestones,
    pub completed_milestones: u8,
    pub completion_percent: u8,
    pub eligibility: EligibilityCategory,
    pub eligibility_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_tier: Option<PhysicalTier>,
    pub athlete_potential: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_queued_at: Option<DateTime<Utc>>,
    pub awaiting_interview: bool,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        let points = total_points(member);
        let points_category = classify(points);
        let eligibility = classify_eligibility(&member.milestones);
        let tier = physical_tier(member.physical_score);

        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            faculty: member.faculty.clone(),
            contact_number: member.contact_number.clone(),
            committee_count: member.committee_count,
            meeting_count: member.meeting_count,
            active_points: member.active_points,
            total_points: points,
            points_category,
            points_label: points_category.label(),
            milestones: member.milestones,
            completed_milestones: completed_milestones(&member.milestones),
            completion_percent: completion_percent(&member.milestones),
            eligibility,
            eligibility_label: eligibility.label(),
            physical_score: member.physical_score,
            physical_notes: member.physical_notes.clone(),
            physical_tier: tier,
            athlete_potential: is_athlete_potential(member.physical_score),
            interview_queued_at: member.interview_queued_at,
            awaiting_interview: member.is_awaiting_interview(),
        }
    }
}

/// Ordered result of one view plus the badge counts shown above it.
#[derive(Debug, Clone, Serialize)]
pub struct RosterListing {
    pub view: RosterView,
    pub shown: usize,
    pub total: usize,
    pub tally: CategoryTally,
    pub members: Vec<MemberView>,
}
