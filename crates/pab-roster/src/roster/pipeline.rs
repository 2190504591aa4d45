//! Filter and ordering stages shared by every roster view.
//!
//! All view state comes in through [`RosterQuery`]; nothing here is stateful.

use super::domain::Member;
use super::scoring::{
    classify, classify_eligibility, completed_milestones, total_points, EligibilityCategory,
    PointsCategory,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Minimum completed milestones for the finalist roster.
pub const FINALIST_MILESTONE_FLOOR: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterView {
    /// Members with at least two milestones, ranked by activity points.
    #[serde(alias = "control_card")]
    Finalists,
    /// Every member, ranked by eligibility.
    #[default]
    #[serde(alias = "status")]
    StatusBoard,
}

impl RosterView {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "finalists" | "control_card" | "control-card" => Some(Self::Finalists),
            "status_board" | "status-board" | "status" => Some(Self::StatusBoard),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Finalists => "Kartu Kontrol",
            Self::StatusBoard => "Status PAB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Points(PointsCategory),
    Eligibility(EligibilityCategory),
}

impl CategoryFilter {
    /// Accepts both the English names and the badge keys of the dashboard.
    pub fn parse(raw: &str) -> Option<Self> {
        let filter = match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "semua" => Self::All,
            "good" | "baik" => Self::Points(PointsCategory::Good),
            "fair" | "cukup" => Self::Points(PointsCategory::Fair),
            "poor" | "kurang" => Self::Points(PointsCategory::Poor),
            "pass" | "lulus" => Self::Eligibility(EligibilityCategory::Pass),
            "conditional" | "bersyarat" => Self::Eligibility(EligibilityCategory::Conditional),
            "fail" | "tidak-lulus" | "tidak_lulus" => {
                Self::Eligibility(EligibilityCategory::Fail)
            }
            _ => return None,
        };
        Some(filter)
    }

    fn admits(self, member: &Member) -> bool {
        match self {
            Self::All => true,
            Self::Points(category) => classify(total_points(member)) == category,
            Self::Eligibility(category) => classify_eligibility(&member.milestones) == category,
        }
    }
}

/// Columns an operator can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Name,
    Faculty,
    ContactNumber,
    CommitteeCount,
    MeetingCount,
    ActivePoints,
    TotalPoints,
    PhysicalScore,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        let field = match raw.trim().to_ascii_lowercase().as_str() {
            "id" | "nim" => Self::Id,
            "name" | "nama" => Self::Name,
            "faculty" | "fakultas" => Self::Faculty,
            "contact_number" | "whatsapp" => Self::ContactNumber,
            "committee_count" => Self::CommitteeCount,
            "meeting_count" => Self::MeetingCount,
            "active_points" => Self::ActivePoints,
            "total_points" => Self::TotalPoints,
            "physical_score" => Self::PhysicalScore,
            _ => return None,
        };
        Some(field)
    }

    fn value(self, member: &Member) -> SortValue {
        match self {
            Self::Id => SortValue::text(member.id.as_str()),
            Self::Name => SortValue::text(&member.name),
            Self::Faculty => SortValue::text(&member.faculty),
            Self::ContactNumber => SortValue::text(&member.contact_number),
            Self::CommitteeCount => SortValue::Number(f64::from(member.committee_count)),
            Self::MeetingCount => SortValue::Number(f64::from(member.meeting_count)),
            Self::ActivePoints => SortValue::Number(member.active_points as f64),
            Self::TotalPoints => SortValue::Number(total_points(member) as f64),
            Self::PhysicalScore => member
                .physical_score
                .map(SortValue::Number)
                .unwrap_or_else(|| SortValue::text("")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ColumnSort {
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Header click: the same column flips direction, a new column starts ascending.
    pub fn toggle(current: Option<ColumnSort>, field: SortField) -> ColumnSort {
        match current {
            Some(active) if active.field == field => ColumnSort {
                field,
                direction: active.direction.reversed(),
            },
            _ => ColumnSort::ascending(field),
        }
    }
}

/// Primary key used when no column sort is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOrder {
    PointsDescending,
    EligibilityDescending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterQuery {
    pub eligibility_floor: bool,
    pub search: String,
    pub category: CategoryFilter,
    pub column_sort: Option<ColumnSort>,
    pub default_order: DefaultOrder,
}

impl RosterQuery {
    pub fn for_view(view: RosterView) -> Self {
        match view {
            RosterView::Finalists => Self {
                eligibility_floor: true,
                search: String::new(),
                category: CategoryFilter::All,
                column_sort: None,
                default_order: DefaultOrder::PointsDescending,
            },
            RosterView::StatusBoard => Self {
                eligibility_floor: false,
                search: String::new(),
                category: CategoryFilter::All,
                column_sort: None,
                default_order: DefaultOrder::EligibilityDescending,
            },
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_column_sort(mut self, sort: Option<ColumnSort>) -> Self {
        self.column_sort = sort;
        self
    }
}

/// Runs the enabled stages in order, then the comparator.
pub fn select<'a>(members: &'a [Member], query: &RosterQuery) -> Vec<&'a Member> {
    let needle = query.search.to_lowercase();
    let mut selected: Vec<&Member> = members
        .iter()
        .filter(|member| {
            !query.eligibility_floor
                || completed_milestones(&member.milestones) >= FINALIST_MILESTONE_FLOOR
        })
        .filter(|member| matches_search(member, &needle))
        .filter(|member| query.category.admits(member))
        .collect();

    selected.sort_by(|a, b| compare(a, b, query));
    selected
}

/// `needle` must already be lowercased.
fn matches_search(member: &Member, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [member.name.as_str(), member.id.as_str(), member.faculty.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &Member, b: &Member, query: &RosterQuery) -> Ordering {
    if let Some(sort) = query.column_sort {
        let ordering = sort.field.value(a).compare(&sort.field.value(b));
        return sort.direction.apply(ordering);
    }

    let primary = match query.default_order {
        DefaultOrder::PointsDescending => total_points(b).cmp(&total_points(a)),
        DefaultOrder::EligibilityDescending => {
            let weight = |member: &Member| classify_eligibility(&member.milestones).weight();
            weight(b).cmp(&weight(a))
        }
    };

    primary.then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }

    /// Missing numbers read as empty text, and empty text sorts before any number.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(_), Self::Number(_)) => Ordering::Less,
            (Self::Number(_), Self::Text(_)) => Ordering::Greater,
        }
    }
}
