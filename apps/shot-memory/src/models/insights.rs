use serde::{Deserialize, Serialize};

use crate::models::shot::{Feedback, ShotRecord, ShotType};

/// Course-wide summary derived from shot history. Read-time projection only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInsights {
    pub course_id: String,
    pub most_played_holes: Vec<u32>,
    pub tricky_holes: Vec<TrickyHole>,
    pub club_insights: Vec<ClubInsight>,
    pub ai_notes: Vec<String>,
    pub hole_details: Vec<HoleDetail>,
}

impl CourseInsights {
    pub fn empty(course_id: impl Into<String>) -> Self {
        CourseInsights {
            course_id: course_id.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.most_played_holes.is_empty()
            && self.tricky_holes.is_empty()
            && self.club_insights.is_empty()
            && self.ai_notes.is_empty()
            && self.hole_details.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickyHole {
    pub hole: u32,
    /// Negative-feedback proxy for strokes over par. Serialized with one decimal.
    #[serde(with = "one_decimal")]
    pub avg_over_par: f64,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubFit {
    HitsShort,
    HitsLong,
    MatchesProfile,
}

impl ClubFit {
    pub fn note(&self) -> &'static str {
        match self {
            ClubFit::HitsShort => "hits short",
            ClubFit::HitsLong => "hits long",
            ClubFit::MatchesProfile => "matches profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubInsight {
    pub club: String,
    /// Mean recorded distance, rounded to the nearest whole unit.
    pub avg: i64,
    /// Reference distance the average is compared against.
    pub profile: u32,
    pub note: String,
    pub fit: ClubFit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleDetail {
    pub hole: u32,
    pub shots: Vec<ShotSummary>,
}

/// Display-safe subset of a shot record. Image locators and free-form
/// payload fields are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<String>,
    pub feedback: Option<Feedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&ShotRecord> for ShotSummary {
    fn from(record: &ShotRecord) -> Self {
        ShotSummary {
            id: record.id.clone(),
            shot_type: record.shot_type.clone(),
            club: record.club().map(str::to_string),
            aim: record
                .recommendation
                .as_ref()
                .map(|r| r.aim.clone())
                .filter(|a| !a.is_empty()),
            distance: record.distance,
            surface: record.surface().map(str::to_string),
            elevation: record.elevation().map(str::to_string),
            wind: record.wind().map(str::to_string),
            feedback: record.user_feedback,
            timestamp: record.timestamp.clone().or_else(|| record.uploaded_at.clone()),
        }
    }
}

mod one_decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:.1}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().map_err(de::Error::custom),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| de::Error::custom("avgOverPar out of range")),
            other => Err(de::Error::custom(format!(
                "avgOverPar must be a number or string, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shot::{Conditions, Recommendation, ShotContext};

    #[test]
    fn test_empty_insights_serialize_as_empty_lists() {
        let insights = CourseInsights::empty("c9");
        let json = serde_json::to_value(&insights).unwrap();
        assert_eq!(json["courseId"], "c9");
        assert_eq!(json["mostPlayedHoles"], serde_json::json!([]));
        assert_eq!(json["holeDetails"], serde_json::json!([]));
        assert!(insights.is_empty());
    }

    #[test]
    fn test_avg_over_par_formatted_one_decimal() {
        let hole = TrickyHole {
            hole: 4,
            avg_over_par: 1.5,
            note: "n".into(),
        };
        let json = serde_json::to_value(&hole).unwrap();
        assert_eq!(json["avgOverPar"], "1.5");

        let back: TrickyHole = serde_json::from_value(json).unwrap();
        assert_eq!(back.avg_over_par, 1.5);
    }

    #[test]
    fn test_summary_drops_image_url() {
        let record = ShotRecord {
            id: "s1".into(),
            course_id: "c".into(),
            hole_number: 1,
            recommendation: Some(Recommendation {
                club: "driver".into(),
                aim: "right center".into(),
                ..Default::default()
            }),
            shot_context: Some(ShotContext {
                surface: "tee".into(),
                conditions: Conditions {
                    wind: "calm".into(),
                    elevation: "".into(),
                    ..Default::default()
                },
                ..Default::default()
            }),
            image_url: Some("/uploads/secret.jpg".into()),
            ..Default::default()
        };
        let summary = ShotSummary::from(&record);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("imageUrl").is_none());
        assert_eq!(json["club"], "driver");
        assert_eq!(json["aim"], "right center");
        assert!(json.get("elevation").is_none());
        assert!(json["feedback"].is_null());
    }
}
