//! Human-facing summary blocks for extracted records.

use crate::extract::Record;

/// Icon in front of each map name.
pub const MAP_ICON: &str = "🗺";
/// Icon in front of the player count.
pub const PLAYERS_ICON: &str = "👥";
/// Single block returned when nothing usable was found.
pub const NO_RESULTS: &str = "❌ Активних карт не знайдено";

/// Default number of records shown.
pub const DEFAULT_SUMMARY_LIMIT: usize = 20;
/// Default number of raw `#` lines shown when extraction found nothing.
pub const DEFAULT_FALLBACK_LIMIT: usize = 15;

/// Display block for one record.
pub fn format_record(record: &Record) -> String {
    let mut block = format!("{} {}", MAP_ICON, record.name);
    if let Some(ref id) = record.id {
        block.push_str("\n   ");
        block.push_str(id);
    }
    if let Some(ref players) = record.players {
        block.push_str(&format!("\n   {} {}", PLAYERS_ICON, players));
    }
    block
}

/// Blocks for the first `limit` records.
pub fn format_records(records: &[Record], limit: usize) -> Vec<String> {
    records.iter().take(limit).map(format_record).collect()
}

/// Summary of one scrape.
///
/// With at least one record this is [`format_records`]. With none it
/// degrades to the first `fallback_limit` raw lines of `lines` containing
/// `#`, and if there are none of those either, a single [`NO_RESULTS`]
/// block.
pub fn summarize<S: AsRef<str>>(
    records: &[Record],
    lines: &[S],
    limit: usize,
    fallback_limit: usize,
) -> Vec<String> {
    if !records.is_empty() {
        return format_records(records, limit);
    }

    let raw: Vec<String> = lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| l.contains('#'))
        .take(fallback_limit)
        .map(String::from)
        .collect();

    if raw.is_empty() {
        vec![NO_RESULTS.to_string()]
    } else {
        raw
    }
}
