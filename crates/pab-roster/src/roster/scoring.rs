//! Activity points and milestone eligibility.
//!
//! Points and eligibility are separate axes: the finalist roster colours and
//! filters by points while the status board filters by eligibility.

use super::domain::{Member, Milestones};
use serde::{Deserialize, Serialize};

pub const COMMITTEE_POINTS: i64 = 10;
pub const MEETING_POINTS: i64 = 5;
pub const TRAINING_POINTS: i64 = 20;

/// Derived total. Recomputed on every read and never persisted.
pub fn total_points(member: &Member) -> i64 {
    let training = if member.milestones.training {
        TRAINING_POINTS
    } else {
        0
    };
    i64::from(member.committee_count) * COMMITTEE_POINTS
        + i64::from(member.meeting_count) * MEETING_POINTS
        + training
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsCategory {
    Good,
    Fair,
    Poor,
}

impl PointsCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Good, Self::Fair, Self::Poor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Baik",
            Self::Fair => "Cukup",
            Self::Poor => "Kurang",
        }
    }
}

/// 40 and 70 both fall in `Fair`.
pub const fn classify(points: i64) -> PointsCategory {
    if points > 70 {
        PointsCategory::Good
    } else if points >= 40 {
        PointsCategory::Fair
    } else {
        PointsCategory::Poor
    }
}

pub fn completed_milestones(milestones: &Milestones) -> u8 {
    [milestones.interview, milestones.physical, milestones.training]
        .into_iter()
        .filter(|done| *done)
        .count() as u8
}

/// Rounded share of completed milestones, as shown on the progress bar.
pub fn completion_percent(milestones: &Milestones) -> u8 {
    let completed = u32::from(completed_milestones(milestones));
    ((completed * 100 + 1) / 3) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityCategory {
    Pass,
    Conditional,
    Fail,
}

impl EligibilityCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Pass, Self::Conditional, Self::Fail]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "Lulus",
            Self::Conditional => "Bersyarat",
            Self::Fail => "Tidak Lulus",
        }
    }

    /// Default ordering weight on the status board.
    pub const fn weight(self) -> u8 {
        match self {
            Self::Pass => 3,
            Self::Conditional => 2,
            Self::Fail => 1,
        }
    }
}

pub fn classify_eligibility(milestones: &Milestones) -> EligibilityCategory {
    match completed_milestones(milestones) {
        3 => EligibilityCategory::Pass,
        2 => EligibilityCategory::Conditional,
        _ => EligibilityCategory::Fail,
    }
}

/// Band of the physical test score as badged on the status board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalTier {
    /// Above 80, flagged as athlete potential.
    Athlete,
    /// Above 60.
    Fit,
    Developing,
}

impl PhysicalTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Athlete => "Potensi Atlet",
            Self::Fit => "Baik",
            Self::Developing => "Perlu Latihan",
        }
    }
}

/// Both thresholds are exclusive: 80 is `Fit` and 60 is `Developing`.
pub fn physical_tier(score: Option<f64>) -> Option<PhysicalTier> {
    let score = score?;
    Some(if score > 80.0 {
        PhysicalTier::Athlete
    } else if score > 60.0 {
        PhysicalTier::Fit
    } else {
        PhysicalTier::Developing
    })
}

pub fn is_athlete_potential(score: Option<f64>) -> bool {
    physical_tier(score) == Some(PhysicalTier::Athlete)
}

/// Per-category counts over a whole collection, for the filter badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub total: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub pass: usize,
    pub conditional: usize,
    pub fail: usize,
}

impl CategoryTally {
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a Member>,
    {
        members.into_iter().fold(Self::default(), |mut tally, member| {
            tally.total += 1;
            match classify(total_points(member)) {
                PointsCategory::Good => tally.good += 1,
                PointsCategory::Fair => tally.fair += 1,
                PointsCategory::Poor => tally.poor += 1,
            }
            match classify_eligibility(&member.milestones) {
                EligibilityCategory::Pass => tally.pass += 1,
                EligibilityCategory::Conditional => tally.conditional += 1,
                EligibilityCategory::Fail => tally.fail += 1,
            }
            tally
        })
    }
}
