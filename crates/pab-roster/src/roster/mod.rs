//! Membership roster for the PAB program: scoring rules, roster views, spreadsheet
//! import, and the interview queue, plus the storage and HTTP seams around them.

pub mod access;
pub mod domain;
pub mod import;
pub mod pipeline;
pub mod queue;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use access::{require_session, AccessGate};
pub use domain::{Member, MemberId, MemberPatch, Milestones};
pub use import::{ImportPlan, ImportReport, ImportRow, RosterImportError, RosterImporter};
pub use pipeline::{
    select, CategoryFilter, ColumnSort, DefaultOrder, RosterQuery, RosterView, SortDirection,
    SortField,
};
pub use queue::{pending_interviews, QueueEntry};
pub use router::roster_router;
pub use scoring::{
    classify, classify_eligibility, completed_milestones, completion_percent,
    is_athlete_potential, physical_tier, total_points, CategoryTally, EligibilityCategory,
    PhysicalTier, PointsCategory,
};
pub use service::{
    CounterUpdate, PhysicalEvaluation, RosterService, RosterServiceError, ValidationError,
};
pub use store::{MemberStore, StoreError, USERS_COLLECTION};
pub use views::{MemberView, RosterListing};
