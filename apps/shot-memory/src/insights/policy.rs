//! Fixed product thresholds for insight and course-intelligence rules.
//! Tune here only; the rules read these and nothing else.

// Insight narrative

/// Below this helpful ratio (with at least one "off") a group reads as a negative pattern.
pub const NEGATIVE_PATTERN_HELPFUL_RATIO: f64 = 0.5;
/// At or above this helpful ratio a group reads as a positive pattern.
pub const POSITIVE_PATTERN_HELPFUL_RATIO: f64 = 0.7;
pub const POSITIVE_PATTERN_MIN_HELPFUL: usize = 2;
/// Minimum shots in a group before a rough-lie caution is emitted.
pub const ROUGH_CAUTION_MIN_SHOTS: usize = 2;

// Shot context conventions

/// An elevation string containing this marker is an uphill shot, e.g. `"+4ft"`.
pub const UPHILL_MARKER: char = '+';
pub const ROUGH_SURFACE: &str = "rough";
/// Wind strings containing any of these count toward a hole's wind note.
pub const WINDY_MARKERS: &[&str] = &["into", "strong"];

// Course intelligence

pub const MOST_PLAYED_LIMIT: usize = 10;
/// Multiplier applied to the negative-feedback share to get `avgOverPar`.
pub const TRICKY_SCORE_SCALE: f64 = 2.0;
/// A hole with at least this many "off" verdicts is tricky regardless of score.
pub const TRICKY_MIN_OFF_COUNT: usize = 2;
/// Placeholder carry distance until per-player club profiles exist.
pub const DEFAULT_REFERENCE_DISTANCE: u32 = 150;
/// Averages within this many units of the reference distance match the profile.
pub const CLUB_FIT_TOLERANCE: f64 = 10.0;
pub const SOFT_FAIRWAY_MIN_ROUGH: usize = 3;
pub const WIND_NOTE_MIN_SHOTS: usize = 3;
pub const UPHILL_NOTE_MIN_DISTINCT: usize = 2;
pub const TREND_POSITIVE_MIN_HELPFUL: usize = 5;
/// Helpful must exceed off by this factor for a positive trend note.
pub const TREND_POSITIVE_FACTOR: usize = 2;
pub const TREND_NEGATIVE_MIN_OFF: usize = 3;
/// Recent shots listed per hole in hole details.
pub const HOLE_DETAIL_LIMIT: usize = 5;
