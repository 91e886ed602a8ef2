use serde::{Deserialize, Serialize};

use crate::models::{ShotRecord, ShotType};

/// Lookup key for prior shots. Course and hole must match exactly; shot type
/// and club narrow the match further when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceQuery {
    pub course_id: String,
    pub hole_number: u32,
    #[serde(default)]
    pub shot_type: Option<ShotType>,
    #[serde(default)]
    pub club: Option<String>,
}

impl RelevanceQuery {
    pub fn new(course_id: impl Into<String>, hole_number: u32) -> Self {
        Self {
            course_id: course_id.into(),
            hole_number,
            ..Default::default()
        }
    }

    pub fn with_shot_type(mut self, shot_type: impl Into<Option<ShotType>>) -> Self {
        self.shot_type = shot_type.into();
        self
    }

    pub fn with_club(mut self, club: impl Into<Option<String>>) -> Self {
        self.club = club.into();
        self
    }

    pub fn matches(&self, record: &ShotRecord) -> bool {
        if record.course_id != self.course_id || record.hole_number != self.hole_number {
            return false;
        }
        if let Some(shot_type) = self.shot_type.as_ref().filter(|t| !t.as_str().is_empty()) {
            if record.shot_type.as_ref() != Some(shot_type) {
                return false;
            }
        }
        if let Some(club) = self.club.as_deref().filter(|c| !c.is_empty()) {
            if record.recommended_club() != Some(club) {
                return false;
            }
        }
        true
    }

    fn is_answerable(&self) -> bool {
        !self.course_id.trim().is_empty() && self.hole_number > 0
    }
}

/// Returns the records matching `query`, newest first.
///
/// Ordering uses `ShotRecord::recorded_at`; ties keep append order. A query
/// without a course or hole matches nothing.
pub fn find_relevant(records: &[ShotRecord], query: &RelevanceQuery) -> Vec<ShotRecord> {
    if !query.is_answerable() {
        return Vec::new();
    }
    let mut matched: Vec<ShotRecord> = records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect();
    matched.sort_by_key(|r| std::cmp::Reverse(r.recorded_at()));
    matched
}
