use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{MemberId, MemberPatch, Milestones};
use super::import::{ImportPlan, ImportReport, ImportRow, RosterImporter};
use super::pipeline::{select, RosterQuery, RosterView};
use super::queue::{pending_interviews, QueueEntry};
use super::scoring::CategoryTally;
use super::store::{MemberStore, StoreError};
use super::views::{MemberView, RosterListing};

/// New committee and meeting totals for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterUpdate {
    pub committee_count: u32,
    pub meeting_count: u32,
}

/// Result of the physical test as entered by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalEvaluation {
    pub score: f64,
    #[serde(default)]
    pub notes: String,
}

impl PhysicalEvaluation {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(ValidationError::PhysicalScoreOutOfRange(self.score));
        }
        Ok(())
    }
}

/// Operator operations over the `users` collection.
pub struct RosterService<S> {
    store: Arc<S>,
}

impl<S> RosterService<S>
where
    S: MemberStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Writes every planned member with create-or-replace.
    ///
    /// A store failure stops the run; members written before it stay written.
    pub fn import(&self, plan: ImportPlan) -> Result<ImportReport, RosterServiceError> {
        let mut created = 0;
        for member in plan.members.iter().cloned() {
            let id = member.id.clone();
            if let Err(err) = self.store.create_or_replace(member) {
                warn!(%id, created, error = %err, "roster import interrupted");
                return Err(err.into());
            }
            created += 1;
        }

        let report = plan.report(created);
        info!(
            rows_read = report.rows_read,
            created = report.created,
            skipped = report.skipped,
            "roster import finished"
        );
        Ok(report)
    }

    pub fn import_rows(&self, rows: Vec<ImportRow>) -> Result<ImportReport, RosterServiceError> {
        self.import(RosterImporter::from_rows(rows))
    }

    pub fn listing(
        &self,
        view: RosterView,
        query: &RosterQuery,
    ) -> Result<RosterListing, RosterServiceError> {
        let members = self.store.list_all()?;
        let members_in_view: Vec<MemberView> = select(&members, query)
            .into_iter()
            .map(MemberView::from)
            .collect();

        Ok(RosterListing {
            view,
            shown: members_in_view.len(),
            total: members.len(),
            tally: CategoryTally::from_members(&members),
            members: members_in_view,
        })
    }

    pub fn summary(&self) -> Result<CategoryTally, RosterServiceError> {
        let members = self.store.list_all()?;
        Ok(CategoryTally::from_members(&members))
    }

    pub fn get(&self, id: &MemberId) -> Result<MemberView, RosterServiceError> {
        let member = self
            .store
            .get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(MemberView::from(&member))
    }

    pub fn update_milestones(
        &self,
        id: &MemberId,
        milestones: Milestones,
    ) -> Result<MemberView, RosterServiceError> {
        self.patch(
            id,
            MemberPatch {
                milestones: Some(milestones),
                ..MemberPatch::default()
            },
        )
    }

    pub fn update_counters(
        &self,
        id: &MemberId,
        counters: CounterUpdate,
    ) -> Result<MemberView, RosterServiceError> {
        self.patch(
            id,
            MemberPatch {
                committee_count: Some(counters.committee_count),
                meeting_count: Some(counters.meeting_count),
                ..MemberPatch::default()
            },
        )
    }

    /// Sets the manual override total; the derived score is unaffected.
    pub fn set_active_points(
        &self,
        id: &MemberId,
        active_points: i64,
    ) -> Result<MemberView, RosterServiceError> {
        self.patch(
            id,
            MemberPatch {
                active_points: Some(active_points),
                ..MemberPatch::default()
            },
        )
    }

    pub fn record_physical_evaluation(
        &self,
        id: &MemberId,
        evaluation: PhysicalEvaluation,
    ) -> Result<MemberView, RosterServiceError> {
        evaluation.validate()?;
        self.patch(
            id,
            MemberPatch {
                physical_score: Some(evaluation.score),
                physical_notes: Some(evaluation.notes),
                ..MemberPatch::default()
            },
        )
    }

    /// Stamps `now` as the enqueue time. Queuing again overwrites the stamp.
    pub fn enqueue_interview(
        &self,
        id: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<MemberView, RosterServiceError> {
        let member = self
            .store
            .get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(previous) = member.interview_queued_at {
            warn!(%id, %previous, "member already queued for interview, overwriting timestamp");
        }

        self.patch(
            id,
            MemberPatch {
                interview_queued_at: Some(now),
                ..MemberPatch::default()
            },
        )
    }

    pub fn interview_queue(&self, now: DateTime<Utc>) -> Result<Vec<QueueEntry>, RosterServiceError> {
        let members = self.store.list_all()?;
        Ok(pending_interviews(&members, now))
    }

    fn patch(&self, id: &MemberId, patch: MemberPatch) -> Result<MemberView, RosterServiceError> {
        let updated = self.store.update_fields(id, &patch)?;
        info!(%id, "member updated");
        Ok(MemberView::from(&updated))
    }
}

/// Input rejected before anything reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("physical score must be a number between 0 and 100, got {0}")]
    PhysicalScoreOutOfRange(f64),
}

/// Error raised by the roster service.
#[derive(Debug, thiserror::Error)]
pub enum RosterServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
