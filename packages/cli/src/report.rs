//! Plain-text renderings of summaries and region statistics.

use wanbei_map_analytics::classify_count;
use wanbei_map_analytics_models::RegionStats;
use wanbei_map_dataset::Dataset;

/// Headline counts of a dataset section.
#[must_use]
pub fn summary(dataset: &Dataset) -> String {
    let s = &dataset.summary;
    let located = dataset.events.iter().filter(|e| e.coordinate.is_some()).count();
    let located = u64::try_from(located).unwrap_or(u64::MAX);
    let rows = [
        ("Events", s.events),
        ("Persons", s.persons),
        ("Locations", s.locations),
        ("Times", s.times),
        ("Nodes", s.total_nodes),
        ("Relationships", s.total_relationships),
        ("With position", located),
    ];

    let body: String = rows
        .iter()
        .map(|(label, value)| format!("  {label:<14} {value}\n"))
        .collect();
    format!("Dataset: {}\n{body}", dataset.name)
}

/// One row per region with its count and density class, followed by
/// totals.
#[must_use]
pub fn stats_table(stats: &RegionStats) -> String {
    let rows: String = stats
        .iter()
        .map(|stat| {
            format!(
                "{:<10} {:<12} {:>6}  {}\n",
                stat.key,
                stat.full_name,
                stat.count,
                classify_count(stat.count).label
            )
        })
        .collect();

    format!(
        "{:<10} {:<12} {:>6}  CLASS\n{}\n{rows}\n{} matched, {} unmatched ({})\n",
        "KEY",
        "NAME",
        "EVENTS",
        "-".repeat(44),
        stats.matched(),
        stats.unmatched.len(),
        stats.mode
    )
}
