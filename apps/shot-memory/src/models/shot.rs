use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

/// Kind of shot being played. Unknown strings are kept verbatim in `Other`
/// so a rewrite of the document never changes what a client stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShotType {
    Drive,
    Approach,
    Chip,
    Putt,
    Recovery,
    Other(String),
}

impl ShotType {
    pub fn as_str(&self) -> &str {
        match self {
            ShotType::Drive => "drive",
            ShotType::Approach => "approach",
            ShotType::Chip => "chip",
            ShotType::Putt => "putt",
            ShotType::Recovery => "recovery",
            ShotType::Other(raw) => raw,
        }
    }
}

impl From<String> for ShotType {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "drive" => ShotType::Drive,
            "approach" => ShotType::Approach,
            "chip" => ShotType::Chip,
            "putt" => ShotType::Putt,
            "recovery" => ShotType::Recovery,
            _ => ShotType::Other(raw),
        }
    }
}

impl From<&str> for ShotType {
    fn from(raw: &str) -> Self {
        ShotType::from(raw.to_string())
    }
}

impl From<ShotType> for String {
    fn from(shot_type: ShotType) -> Self {
        match shot_type {
            ShotType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User verdict on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Helpful,
    Off,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Helpful => "helpful",
            Feedback::Off => "off",
        }
    }

    /// Parses a client-supplied verdict. Anything other than `helpful`/`off` is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "helpful" => Some(Feedback::Helpful),
            "off" => Some(Feedback::Off),
            _ => None,
        }
    }
}

/// AI recommendation attached to an analyzed shot.
/// Missing or null fields decode as empty strings and `0.0` confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub club: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub aim: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub avoid: String,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default, deserialize_with = "lenient_string")]
    pub wind: String,
    /// Free-form, e.g. `"+4ft"`. A leading `+` marks an uphill shot.
    #[serde(default, deserialize_with = "lenient_string")]
    pub elevation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotContext {
    #[serde(default, deserialize_with = "lenient_string")]
    pub surface: String,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One persisted shot and its outcome.
///
/// Only the feedback fields are ever mutated after creation. Fields the
/// core does not model are carried in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_id: String,
    #[serde(default, deserialize_with = "lenient_hole_number")]
    pub hole_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<ShotType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_context: Option<ShotContext>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub club_used: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_distance",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_feedback")]
    pub user_feedback: Option<Feedback>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback_timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Capture-time fields handed over by the upload path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShot {
    pub course_id: String,
    pub hole_number: u32,
    #[serde(default)]
    pub shot_type: Option<ShotType>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
    #[serde(default)]
    pub shot_context: Option<ShotContext>,
    #[serde(default)]
    pub club_used: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Client-side capture time; the upload time is used when absent.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ShotRecord {
    /// Builds a fresh record for a captured shot with a new id and no feedback.
    pub fn from_capture(shot: NewShot) -> Self {
        let now = Utc::now().to_rfc3339();
        ShotRecord {
            id: Uuid::new_v4().to_string(),
            course_id: shot.course_id,
            hole_number: shot.hole_number,
            shot_type: shot.shot_type,
            recommendation: shot.recommendation,
            shot_context: shot.shot_context,
            club_used: shot.club_used,
            distance: shot.distance,
            user_feedback: None,
            feedback_timestamp: None,
            timestamp: Some(shot.timestamp.unwrap_or_else(|| now.clone())),
            uploaded_at: Some(now),
            image_url: shot.image_url,
            extra: Map::new(),
        }
    }

    /// Builds a standalone record that only carries a feedback verdict.
    pub fn feedback_only(
        course_id: impl Into<String>,
        hole_number: u32,
        club: Option<String>,
        feedback: Feedback,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        ShotRecord {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            hole_number,
            club_used: club.filter(|c| !c.trim().is_empty()),
            user_feedback: Some(feedback),
            feedback_timestamp: Some(now.clone()),
            timestamp: Some(now),
            ..Default::default()
        }
    }

    pub fn apply_feedback(&mut self, feedback: Feedback, at: DateTime<Utc>) {
        self.user_feedback = Some(feedback);
        self.feedback_timestamp = Some(at.to_rfc3339());
    }

    /// Best-known capture instant: `timestamp`, then `uploadedAt`, then the epoch.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        [self.timestamp.as_deref(), self.uploaded_at.as_deref()]
            .into_iter()
            .flatten()
            .find_map(parse_instant)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn recommended_club(&self) -> Option<&str> {
        self.recommendation
            .as_ref()
            .map(|r| r.club.as_str())
            .filter(|c| !c.trim().is_empty())
    }

    fn club_used_str(&self) -> Option<&str> {
        self.club_used.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Club the shot is attributed to for distance stats: recommendation first.
    pub fn club(&self) -> Option<&str> {
        self.recommended_club().or_else(|| self.club_used_str())
    }

    /// Club the player actually hit, falling back to the recommended one.
    pub fn played_club(&self) -> Option<&str> {
        self.club_used_str().or_else(|| self.recommended_club())
    }

    pub fn surface(&self) -> Option<&str> {
        self.shot_context
            .as_ref()
            .map(|c| c.surface.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn elevation(&self) -> Option<&str> {
        self.shot_context
            .as_ref()
            .map(|c| c.conditions.elevation.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn wind(&self) -> Option<&str> {
        self.shot_context
            .as_ref()
            .map(|c| c.conditions.wind.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn is_feedback_only(&self) -> bool {
        self.recommendation.is_none() && self.shot_context.is_none() && self.image_url.is_none()
    }
}

/// Parses an ISO-8601 instant. Zone-less values are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// Form uploads and older clients persist scalars loosely: numbers as strings,
// ids as numbers, nulls where a value is expected. Accept all of them.

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_to_string).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_to_string))
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|c: &f64| c.is_finite())
    .unwrap_or(0.0))
}

fn lenient_hole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_distance<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|d: &f64| d.is_finite()))
}

fn lenient_feedback<'de, D>(deserializer: D) -> Result<Option<Feedback>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let parsed = Feedback::parse(&s);
            if parsed.is_none() {
                warn!(value = %s, "Ignoring unrecognised userFeedback value");
            }
            Ok(parsed)
        }
        Some(other) => {
            warn!(value = %other, "Ignoring non-string userFeedback value");
            Ok(None)
        }
    }
}
