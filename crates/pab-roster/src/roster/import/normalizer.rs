use super::parser::ImportRow;
use crate::roster::domain::{Member, MemberId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Deduplicated payloads ready for `create_or_replace`, plus row accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub members: Vec<Member>,
    pub rows_read: usize,
    pub duplicates: usize,
    pub missing_id: usize,
}

impl ImportPlan {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.missing_id
    }

    pub fn report(&self, created: usize) -> ImportReport {
        ImportReport {
            rows_read: self.rows_read,
            created,
            skipped: self.skipped(),
            duplicates: self.duplicates,
            missing_id: self.missing_id,
        }
    }
}

/// Operator-facing counts of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows_read: usize,
    pub created: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub missing_id: usize,
}

impl ImportReport {
    pub fn message(&self) -> String {
        if self.skipped > 0 {
            format!(
                "saved {} of {} rows ({} skipped: {} duplicate, {} without identifier)",
                self.created, self.rows_read, self.skipped, self.duplicates, self.missing_id
            )
        } else {
            format!("saved {} of {} rows", self.created, self.rows_read)
        }
    }
}

/// First row per identifier+name key wins.
///
/// Rows sharing an identifier but spelling the name differently are kept as
/// separate keys; the later one replaces the earlier document on write.
pub fn normalize_rows(rows: Vec<ImportRow>) -> ImportPlan {
    let rows_read = rows.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut members = Vec::new();
    let mut duplicates = 0;
    let mut missing_id = 0;

    for (index, row) in rows.into_iter().enumerate() {
        // Cells are trimmed before keying, so " 0231 " is stored as "0231" and a
        // whitespace-only identifier counts as missing.
        let id = row.id.trim();
        let name = row.name.trim();

        if id.is_empty() {
            warn!(row = index + 1, name, "skipping roster row without identifier");
            missing_id += 1;
            continue;
        }

        if !seen.insert(format!("{id}_{name}")) {
            debug!(row = index + 1, id, name, "skipping duplicate roster row");
            duplicates += 1;
            continue;
        }

        members.push(Member::new(
            MemberId(id.to_string()),
            name,
            row.faculty.trim(),
            row.contact_number.trim(),
        ));
    }

    ImportPlan {
        members,
        rows_read,
        duplicates,
        missing_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::domain::Milestones;

    #[test]
    fn identical_rows_collapse_to_one() {
        let plan = normalize_rows(vec![
            ImportRow::new("A1", "X", "", ""),
            ImportRow::new("A1", "X", "", ""),
        ]);
        assert_eq!(plan.members.len(), 1);
        assert_eq!(plan.duplicates, 1);
        assert_eq!(plan.skipped(), 1);
    }

    #[test]
    fn empty_identifier_is_skipped() {
        let plan = normalize_rows(vec![
            ImportRow::new("A1", "X", "", ""),
            ImportRow::new("", "Y", "", ""),
        ]);
        assert_eq!(plan.members.len(), 1);
        assert_eq!(plan.missing_id, 1);
        assert_eq!(plan.report(1).skipped, 1);
    }

    #[test]
    fn padded_identifiers_dedup_with_trimmed_ones() {
        let plan = normalize_rows(vec![
            ImportRow::new("0231", "Rani", "", ""),
            ImportRow::new(" 0231 ", "Rani ", "", ""),
            ImportRow::new("   ", "Blank", "", ""),
        ]);
        assert_eq!(plan.members.len(), 1);
        assert_eq!(plan.duplicates, 1);
        assert_eq!(plan.missing_id, 1);
    }

    #[test]
    fn same_identifier_with_different_name_is_kept() {
        let plan = normalize_rows(vec![
            ImportRow::new("A1", "Xavier", "", ""),
            ImportRow::new("A1", "Xavier P.", "", ""),
        ]);
        assert_eq!(plan.members.len(), 2);
        assert_eq!(plan.duplicates, 0);
    }

    #[test]
    fn payloads_start_from_zero() {
        let plan = normalize_rows(vec![ImportRow::new(" 0231 ", " Rani ", "Teknik", "0812")]);
        let member = &plan.members[0];
        assert_eq!(member.id.as_str(), "0231");
        assert_eq!(member.name, "Rani");
        assert_eq!(member.committee_count, 0);
        assert_eq!(member.meeting_count, 0);
        assert_eq!(member.active_points, 0);
        assert_eq!(member.milestones, Milestones::default());
    }

    #[test]
    fn report_message_mentions_skips() {
        let plan = normalize_rows(vec![
            ImportRow::new("A1", "X", "", ""),
            ImportRow::new("", "Y", "", ""),
        ]);
        let message = plan.report(1).message();
        assert!(message.contains("1 skipped"));
        let clean = normalize_rows(vec![ImportRow::new("A1", "X", "", "")]).report(1);
        assert_eq!(clean.message(), "saved 1 of 1 rows");
    }
}
