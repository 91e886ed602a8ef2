//! Course intelligence: a whole-course summary over one course's shot history.
//!
//! `avgOverPar` is a negative-feedback proxy, not a real over-par figure, and
//! club fit compares against a single reference distance rather than a player
//! profile. Both are kept as-is until scoring data exists.

use std::collections::{BTreeMap, BTreeSet};

use crate::insights::policy::{
    CLUB_FIT_TOLERANCE, HOLE_DETAIL_LIMIT, MOST_PLAYED_LIMIT, ROUGH_SURFACE,
    SOFT_FAIRWAY_MIN_ROUGH, TREND_NEGATIVE_MIN_OFF, TREND_POSITIVE_FACTOR,
    TREND_POSITIVE_MIN_HELPFUL, TRICKY_MIN_OFF_COUNT, TRICKY_SCORE_SCALE, UPHILL_MARKER,
    UPHILL_NOTE_MIN_DISTINCT, WINDY_MARKERS, WIND_NOTE_MIN_SHOTS,
};
use crate::insights::tally::FeedbackTally;
use crate::models::{
    ClubFit, ClubInsight, CourseInsights, HoleDetail, ShotRecord, ShotSummary, TrickyHole,
};
use crate::store::is_valid;

/// Builds the course summary for `course_id` from `records`.
///
/// Records for other courses, and records missing id/course/hole, are
/// ignored. No matching history yields `CourseInsights::empty`.
pub fn compute_course_insights(
    course_id: &str,
    records: &[ShotRecord],
    reference_distance: u32,
) -> CourseInsights {
    let course: Vec<&ShotRecord> = records
        .iter()
        .filter(|r| r.course_id == course_id && is_valid(r))
        .collect();
    if course.is_empty() {
        return CourseInsights::empty(course_id);
    }

    let holes = group_by_hole(&course);

    CourseInsights {
        course_id: course_id.to_string(),
        most_played_holes: most_played_holes(&holes),
        tricky_holes: tricky_holes(&holes),
        club_insights: club_insights(&course, reference_distance),
        ai_notes: course_notes(&course, &holes),
        hole_details: hole_details(&holes),
    }
}

fn group_by_hole<'a>(records: &[&'a ShotRecord]) -> BTreeMap<u32, Vec<&'a ShotRecord>> {
    let mut holes: BTreeMap<u32, Vec<&ShotRecord>> = BTreeMap::new();
    for &record in records {
        holes.entry(record.hole_number).or_default().push(record);
    }
    holes
}

fn is_uphill(record: &ShotRecord) -> bool {
    record
        .elevation()
        .is_some_and(|e| e.contains(UPHILL_MARKER))
}

fn is_rough(record: &ShotRecord) -> bool {
    record
        .surface()
        .is_some_and(|s| s == ROUGH_SURFACE)
}

fn is_windy(record: &ShotRecord) -> bool {
    record.wind().is_some_and(|w| {
        let w = w.to_ascii_lowercase();
        WINDY_MARKERS.iter().any(|m| w.contains(m))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Hole rankings
// ────────────────────────────────────────────────────────────────────────────

/// Holes by descending shot count; equal counts keep hole order.
fn most_played_holes(holes: &BTreeMap<u32, Vec<&ShotRecord>>) -> Vec<u32> {
    let mut counts: Vec<(u32, usize)> = holes.iter().map(|(h, s)| (*h, s.len())).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MOST_PLAYED_LIMIT)
        .map(|(hole, _)| hole)
        .collect()
}

/// `TRICKY_SCORE_SCALE × off share` when "off" is the majority verdict, else 0.
/// Rounded to one decimal.
pub fn tricky_score(tally: &FeedbackTally) -> f64 {
    match tally.off_ratio() {
        Some(off_ratio) if tally.off > tally.helpful => {
            (TRICKY_SCORE_SCALE * off_ratio * 10.0).round() / 10.0
        }
        _ => 0.0,
    }
}

fn tricky_holes(holes: &BTreeMap<u32, Vec<&ShotRecord>>) -> Vec<TrickyHole> {
    let mut tricky: Vec<TrickyHole> = holes
        .iter()
        .filter_map(|(hole, shots)| {
            let tally = FeedbackTally::from_records(shots.iter().copied());
            let score = tricky_score(&tally);
            let uphill = shots.iter().any(|s| is_uphill(s));
            let many_off = tally.off >= TRICKY_MIN_OFF_COUNT;
            if score <= 0.0 && !uphill && !many_off {
                return None;
            }

            let note = if uphill {
                "Plays uphill; take at least one extra club.".to_string()
            } else if many_off {
                format!(
                    "{} recommendations marked off here; play to the safe side.",
                    tally.off
                )
            } else {
                "Recommendations here have missed more often than not.".to_string()
            };
            Some(TrickyHole {
                hole: *hole,
                avg_over_par: score,
                note,
            })
        })
        .collect();
    tricky.sort_by(|a, b| b.avg_over_par.total_cmp(&a.avg_over_par));
    tricky
}

// ────────────────────────────────────────────────────────────────────────────
// Club fit
// ────────────────────────────────────────────────────────────────────────────

/// Average recorded distance per club, in first-seen club order. Clubs with
/// no distance samples are left out. Fit is judged on the exact mean; only the
/// reported `avg` is rounded.
fn club_insights(records: &[&ShotRecord], reference_distance: u32) -> Vec<ClubInsight> {
    let mut samples: Vec<(&str, Vec<f64>)> = Vec::new();
    for &record in records {
        let Some(club) = record.club() else { continue };
        let index = match samples.iter().position(|(c, _)| *c == club) {
            Some(i) => i,
            None => {
                samples.push((club, Vec::new()));
                samples.len() - 1
            }
        };
        if let Some(distance) = record.distance {
            samples[index].1.push(distance);
        }
    }

    samples
        .into_iter()
        .filter(|(_, distances)| !distances.is_empty())
        .map(|(club, distances)| {
            let mean = distances.iter().sum::<f64>() / distances.len() as f64;
            let fit = classify_club_fit(mean, reference_distance);
            ClubInsight {
                club: club.to_string(),
                // `as` saturates on out-of-range means.
                avg: mean.round() as i64,
                profile: reference_distance,
                note: fit.note().to_string(),
                fit,
            }
        })
        .collect()
}

pub fn classify_club_fit(mean: f64, reference_distance: u32) -> ClubFit {
    let diff = mean - f64::from(reference_distance);
    if diff < -CLUB_FIT_TOLERANCE {
        ClubFit::HitsShort
    } else if diff > CLUB_FIT_TOLERANCE {
        ClubFit::HitsLong
    } else {
        ClubFit::MatchesProfile
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative notes
// ────────────────────────────────────────────────────────────────────────────

fn course_notes(records: &[&ShotRecord], holes: &BTreeMap<u32, Vec<&ShotRecord>>) -> Vec<String> {
    let mut notes = Vec::new();

    let rough = records.iter().filter(|r| is_rough(r)).count();
    if rough >= SOFT_FAIRWAY_MIN_ROUGH {
        notes.push(format!(
            "Soft fairways and thick rough: {rough} shots have come from the rough on this course. \
             Favor accuracy over distance."
        ));
    }

    for (hole, shots) in holes {
        let windy = shots.iter().filter(|s| is_windy(s)).count();
        if windy >= WIND_NOTE_MIN_SHOTS {
            notes.push(format!(
                "Wind into on Hole {hole}: {windy} shots recorded into or strong wind. Club up and \
                 keep the ball flight low."
            ));
        }
    }

    let uphill_values: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.elevation())
        .filter(|e| e.contains(UPHILL_MARKER))
        .collect();
    if uphill_values.len() >= UPHILL_NOTE_MIN_DISTINCT {
        notes.push(
            "Several uphill holes on this course; approach shots tend to play longer than the \
             yardage."
                .to_string(),
        );
    }

    let tally = FeedbackTally::from_records(records.iter().copied());
    if tally.helpful > TREND_POSITIVE_FACTOR * tally.off
        && tally.helpful >= TREND_POSITIVE_MIN_HELPFUL
    {
        notes.push(format!(
            "Recommendations are working well here: {} helpful vs {} off.",
            tally.helpful, tally.off
        ));
    } else if tally.off > tally.helpful && tally.off >= TREND_NEGATIVE_MIN_OFF {
        notes.push(format!(
            "Recommendations have been missing on this course: {} off vs {} helpful. Expect \
             more conservative advice.",
            tally.off, tally.helpful
        ));
    }

    notes
}

// ────────────────────────────────────────────────────────────────────────────
// Hole details
// ────────────────────────────────────────────────────────────────────────────

/// Most recent shots per hole, holes ascending.
fn hole_details(holes: &BTreeMap<u32, Vec<&ShotRecord>>) -> Vec<HoleDetail> {
    holes
        .iter()
        .map(|(hole, shots)| {
            let mut recent = shots.clone();
            recent.sort_by_key(|r| std::cmp::Reverse(r.recorded_at()));
            HoleDetail {
                hole: *hole,
                shots: recent
                    .into_iter()
                    .take(HOLE_DETAIL_LIMIT)
                    .map(ShotSummary::from)
                    .collect(),
            }
        })
        .collect()
}
