// Prompt blocks appended to the shot-analysis request by the upload path.
// The vision call itself happens outside this crate.

use crate::insights::narrative::generate_insight_narrative;
use crate::models::ShotRecord;

pub const HISTORY_HEADER: &str = "PLAYER HISTORY ON THIS HOLE";

pub const HISTORY_FOOTER: &str = "\
Use this history to adjust the recommendation. \
Do not repeat advice the player has marked as off.";

/// Wraps the insight narrative for `relevant` (newest first) in a labelled
/// prompt block. Returns `None` when there is nothing worth saying.
pub fn format_history_context(relevant: &[ShotRecord]) -> Option<String> {
    let narrative = generate_insight_narrative(relevant);
    if narrative.is_empty() {
        return None;
    }

    let mut block = format!("{HISTORY_HEADER} ({} previous shots):\n\n", relevant.len());
    block.push_str(&narrative);
    if let Some(club) = relevant.iter().find_map(ShotRecord::recommended_club) {
        block.push_str(&format!("\n\nMost recent recommendation here: {club}."));
    }
    block.push_str("\n\n");
    block.push_str(HISTORY_FOOTER);
    Some(block)
}
