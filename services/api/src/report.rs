use crate::infra::FileBackedMemberStore;
use chrono::Utc;
use clap::Args;
use pab_roster::config::AppConfig;
use pab_roster::error::AppError;
use pab_roster::roster::{
    CategoryFilter, ColumnSort, QueueEntry, RosterImporter, RosterListing, RosterQuery,
    RosterService, RosterView, SortDirection, SortField,
};
use pab_roster::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with NIM, Nama, Fakultas and WhatsApp columns
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// `finalists` (control card) or `status` (PAB status board)
    #[arg(long, default_value = "status", value_parser = parse_view)]
    pub(crate) view: RosterView,
    /// Case-insensitive match on name, identifier or faculty
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Points (baik, cukup, kurang) or eligibility (lulus, bersyarat, tidak-lulus) category
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<CategoryFilter>,
    /// Column to sort by instead of the view's default order
    #[arg(long, value_parser = parse_sort_field)]
    pub(crate) sort: Option<SortField>,
    /// Sort the chosen column in descending order
    #[arg(long, requires = "sort")]
    pub(crate) desc: bool,
}

fn parse_view(raw: &str) -> Result<RosterView, String> {
    RosterView::parse(raw).ok_or_else(|| format!("unknown roster view '{raw}'"))
}

fn parse_category(raw: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(raw).ok_or_else(|| format!("unknown category '{raw}'"))
}

fn parse_sort_field(raw: &str) -> Result<SortField, String> {
    SortField::parse(raw).ok_or_else(|| format!("unknown sort column '{raw}'"))
}

fn open_service() -> Result<RosterService<FileBackedMemberStore>, AppError> {
    let config = AppConfig::load()?;
    let store = FileBackedMemberStore::open(config.storage.data_path)?;
    Ok(RosterService::new(Arc::new(store)))
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let plan = RosterImporter::from_path(&args.path)?;
    let store = FileBackedMemberStore::open(config.storage.data_path)?;
    let report = RosterService::new(Arc::new(store)).import(plan)?;

    println!("Roster import from {}", args.path.display());
    println!("{}", report.message());
    Ok(())
}

pub(crate) fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let RosterArgs {
        view,
        search,
        category,
        sort,
        desc,
    } = args;

    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let query = RosterQuery::for_view(view)
        .with_search(search.unwrap_or_default())
        .with_category(category.unwrap_or(CategoryFilter::All))
        .with_column_sort(sort.map(|field| ColumnSort { field, direction }));

    let listing = open_service()?.listing(view, &query)?;
    for line in listing_lines(&listing) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_queue() -> Result<(), AppError> {
    let queue = open_service()?.interview_queue(Utc::now())?;
    for line in queue_lines(&queue) {
        println!("{line}");
    }
    Ok(())
}

fn listing_lines(listing: &RosterListing) -> Vec<String> {
    let tally = &listing.tally;
    let mut lines = vec![
        format!(
            "{}: showing {} of {} members",
            listing.view.label(),
            listing.shown,
            listing.total
        ),
        format!(
            "Points: Baik {} | Cukup {} | Kurang {}",
            tally.good, tally.fair, tally.poor
        ),
        format!(
            "Eligibility: Lulus {} | Bersyarat {} | Tidak Lulus {}",
            tally.pass, tally.conditional, tally.fail
        ),
    ];

    if listing.members.is_empty() {
        lines.push("No members match the current filters".to_string());
        return lines;
    }

    lines.push(String::new());
    for member in &listing.members {
        let mut line = format!(
            "- {} {} ({}): {} points [{}], {}/3 milestones ({}%), {}",
            member.id,
            member.name,
            member.faculty,
            member.total_points,
            member.points_label,
            member.completed_milestones,
            member.completion_percent,
            member.eligibility_label
        );
        if let (Some(score), Some(tier)) = (member.physical_score, member.physical_tier) {
            line.push_str(&format!(", physical {score} [{}]", tier.label()));
        }
        lines.push(line);
    }
    lines
}

fn queue_lines(queue: &[QueueEntry]) -> Vec<String> {
    if queue.is_empty() {
        return vec!["Interview queue: empty".to_string()];
    }

    let mut lines = vec![format!("Interview queue ({} waiting)", queue.len())];
    for entry in queue {
        let marker = if entry.is_next { " <- next" } else { "" };
        lines.push(format!(
            "{}. {} ({}, {}) waiting {} min{}",
            entry.position, entry.name, entry.id, entry.faculty, entry.wait_minutes, marker
        ));
    }
    lines
}
