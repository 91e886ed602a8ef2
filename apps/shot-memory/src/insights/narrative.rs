//! Insight narrative. Turns relevant shot history into guidance sentences
//! for the recommendation prompt.
//!
//! Records are grouped by shot type (first-seen order), then by hole
//! (ascending). Each group may contribute:
//! - one feedback sentence: negative pattern, positive pattern, or nothing
//!   for mixed/weak signal
//! - an uphill sentence when any elevation carries the uphill marker
//! - a rough-lie caution when the group has enough shots and any came from the rough
//!
//! Sentences are separated by a blank line. No history means an empty string.

use std::collections::BTreeMap;

use crate::insights::policy::{
    NEGATIVE_PATTERN_HELPFUL_RATIO, POSITIVE_PATTERN_HELPFUL_RATIO, POSITIVE_PATTERN_MIN_HELPFUL,
    ROUGH_CAUTION_MIN_SHOTS, ROUGH_SURFACE, UPHILL_MARKER,
};
use crate::insights::tally::FeedbackTally;
use crate::models::{Feedback, ShotRecord, ShotType};

type HoleGroups<'a> = BTreeMap<u32, Vec<&'a ShotRecord>>;

pub fn generate_insight_narrative(records: &[ShotRecord]) -> String {
    let mut sentences = Vec::new();
    for (shot_type, holes) in group_records(records) {
        let label = shot_type.map(ShotType::as_str).unwrap_or("shot");
        for (hole, group) in holes {
            sentences.extend(group_sentences(hole, label, &group));
        }
    }
    sentences.join("\n\n")
}

fn group_records(records: &[ShotRecord]) -> Vec<(Option<&ShotType>, HoleGroups<'_>)> {
    let mut groups: Vec<(Option<&ShotType>, HoleGroups<'_>)> = Vec::new();
    for record in records {
        let key = record.shot_type.as_ref();
        let index = match groups.iter().position(|(t, _)| *t == key) {
            Some(i) => i,
            None => {
                groups.push((key, BTreeMap::new()));
                groups.len() - 1
            }
        };
        groups[index]
            .1
            .entry(record.hole_number)
            .or_default()
            .push(record);
    }
    groups
}

fn group_sentences(hole: u32, label: &str, group: &[&ShotRecord]) -> Vec<String> {
    let mut sentences = Vec::new();

    let tally = FeedbackTally::from_records(group.iter().copied());
    if let Some(helpful_ratio) = tally.helpful_ratio() {
        if helpful_ratio < NEGATIVE_PATTERN_HELPFUL_RATIO && tally.off > 0 {
            let clubs = distinct_clubs(group.iter().copied());
            sentences.push(format!(
                "Hole {hole} ({label}): past recommendations were marked off {} of {} times \
                 (clubs used: {}). Adjust club selection or aim for this shot.",
                tally.off,
                tally.total(),
                clubs
            ));
        } else if helpful_ratio >= POSITIVE_PATTERN_HELPFUL_RATIO
            && tally.helpful >= POSITIVE_PATTERN_MIN_HELPFUL
        {
            let clubs = distinct_clubs(
                group
                    .iter()
                    .copied()
                    .filter(|r| r.user_feedback == Some(Feedback::Helpful)),
            );
            sentences.push(format!(
                "Hole {hole} ({label}): past recommendations worked well, marked helpful {} of {} \
                 times. Clubs that worked: {}.",
                tally.helpful,
                tally.total(),
                clubs
            ));
        }
    }

    let uphill = group
        .iter()
        .filter(|r| r.elevation().is_some_and(|e| e.contains(UPHILL_MARKER)))
        .count();
    if uphill > 0 {
        sentences.push(format!(
            "Hole {hole} ({label}): {uphill} previous {} played uphill. Uphill shots here have \
             tended to need extra club.",
            plural(uphill, "shot was", "shots were")
        ));
    }

    let rough = group
        .iter()
        .filter(|r| r.surface() == Some(ROUGH_SURFACE))
        .count();
    if rough > 0 && group.len() >= ROUGH_CAUTION_MIN_SHOTS {
        sentences.push(format!(
            "Hole {hole} ({label}): {rough} of {} previous shots came from the rough. Favor a \
             conservative target that gets the ball back in play.",
            group.len()
        ));
    }

    sentences
}

fn distinct_clubs<'a>(records: impl Iterator<Item = &'a ShotRecord>) -> String {
    let mut clubs: Vec<&str> = Vec::new();
    for club in records.filter_map(ShotRecord::played_club) {
        if !clubs.contains(&club) {
            clubs.push(club);
        }
    }
    if clubs.is_empty() {
        "not recorded".to_string()
    } else {
        clubs.join(", ")
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
