use std::sync::Arc;

use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::StoreError;
use crate::feedback::{self, FeedbackOutcome, FeedbackSubmission};
use crate::insights::{self, RelevanceQuery};
use crate::models::{CourseInsights, NewShot, ShotRecord};
use crate::store::ShotStore;

static SHARED: OnceCell<ShotMemory> = OnceCell::const_new();

/// Entry point for the request layer. Cheap to clone; all clones share one store.
///
/// Reads are best-effort: a storage failure is logged and reads as empty.
/// Use `store()` directly to see the underlying `StoreError`.
#[derive(Clone)]
pub struct ShotMemory {
    store: Arc<ShotStore>,
    config: Config,
}

impl ShotMemory {
    pub fn new(store: ShotStore, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// File-backed instance at `config.store_path`.
    pub fn from_config(config: Config) -> Self {
        let store = ShotStore::open(config.store_path.clone());
        Self::new(store, config)
    }

    /// Process-wide instance, built from the environment on first use and
    /// never torn down.
    pub async fn shared() -> Result<&'static ShotMemory> {
        SHARED
            .get_or_try_init(|| async {
                let config = Config::from_env()?;
                info!(
                    store_path = %config.store_path.display(),
                    reference_distance = config.club_reference_distance,
                    "Shot memory initialized"
                );
                Ok::<_, anyhow::Error>(Self::from_config(config))
            })
            .await
    }

    pub fn store(&self) -> &ShotStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn append_shot(&self, record: ShotRecord) -> Result<String, StoreError> {
        self.store.append(record).await
    }

    /// Records a freshly analyzed shot and returns its new id.
    pub async fn capture_shot(&self, shot: NewShot) -> Result<String, StoreError> {
        self.append_shot(ShotRecord::from_capture(shot)).await
    }

    pub async fn get_all_shots(&self) -> Vec<ShotRecord> {
        self.store.get_all().await.unwrap_or_else(|e| {
            error!(error = %e, "Failed to read shot records");
            Vec::new()
        })
    }

    pub async fn find_relevant_shots(&self, query: &RelevanceQuery) -> Vec<ShotRecord> {
        let records = self.get_all_shots().await;
        insights::find_relevant(&records, query)
    }

    pub fn generate_insight_narrative(&self, relevant: &[ShotRecord]) -> String {
        insights::generate_insight_narrative(relevant)
    }

    /// Prompt block describing the player's history for `query`, if any.
    pub async fn history_context(&self, query: &RelevanceQuery) -> Option<String> {
        let relevant = self.find_relevant_shots(query).await;
        insights::format_history_context(&relevant)
    }

    pub async fn course_intelligence(&self, course_id: &str) -> CourseInsights {
        let records = match self.store.shots_for_course(course_id).await {
            Ok(records) => records,
            Err(e) => {
                error!(course_id, error = %e, "Failed to read course history");
                return CourseInsights::empty(course_id);
            }
        };
        insights::compute_course_insights(course_id, &records, self.config.club_reference_distance)
    }

    pub async fn submit_feedback(&self, submission: FeedbackSubmission) -> FeedbackOutcome {
        feedback::submit_feedback(&self.store, submission).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Conditions, Feedback, Recommendation, ShotContext, ShotType};

    fn memory() -> ShotMemory {
        ShotMemory::new(ShotStore::in_memory(), Config::default())
    }

    fn approach(hole: u32, club: &str, distance: f64, ts: &str) -> NewShot {
        NewShot {
            course_id: "torrey-south".into(),
            hole_number: hole,
            shot_type: Some(ShotType::Approach),
            recommendation: Some(Recommendation {
                club: club.into(),
                aim: "center".into(),
                avoid: "left bunker".into(),
                confidence: 0.7,
                ..Default::default()
            }),
            shot_context: Some(ShotContext {
                surface: "fairway".into(),
                conditions: Conditions {
                    wind: "calm".into(),
                    elevation: "+3ft".into(),
                    ..Default::default()
                },
                ..Default::default()
            }),
            club_used: Some(club.into()),
            distance: Some(distance),
            image_url: Some("/uploads/shot.jpg".into()),
            timestamp: Some(ts.into()),
        }
    }

    #[tokio::test]
    async fn test_capture_feedback_and_recall() {
        let memory = memory();
        let mut ids = Vec::new();
        for (i, ts) in ["2024-04-01T09:00:00Z", "2024-04-08T09:00:00Z", "2024-04-15T09:00:00Z"]
            .iter()
            .enumerate()
        {
            let id = memory
                .capture_shot(approach(5, "7 iron", 150.0 + i as f64, ts))
                .await
                .unwrap();
            ids.push(id);
        }
        for id in &ids {
            let outcome = memory
                .submit_feedback(FeedbackSubmission {
                    shot_id: Some(id.clone()),
                    course_id: "torrey-south".into(),
                    hole_number: 5,
                    suggested_club: Some("7 iron".into()),
                    feedback: Feedback::Helpful,
                })
                .await;
            assert!(matches!(outcome, FeedbackOutcome::Updated { .. }));
        }

        let query = RelevanceQuery::new("torrey-south", 5).with_shot_type(ShotType::Approach);
        let relevant = memory.find_relevant_shots(&query).await;
        assert_eq!(
            relevant.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
            ids.iter().rev().cloned().collect::<Vec<_>>()
        );

        let narrative = memory.generate_insight_narrative(&relevant);
        assert!(narrative.contains("Hole 5"));
        assert!(narrative.contains("7 iron"));
        assert!(narrative.contains("worked well"));
        assert!(narrative.contains("3 previous shots were played uphill"));

        let context = memory.history_context(&query).await.unwrap();
        assert!(context.contains("Most recent recommendation here: 7 iron."));
    }

    #[tokio::test]
    async fn test_course_intelligence_end_to_end() {
        let memory = memory();
        memory
            .capture_shot(approach(3, "8 iron", 128.0, "2024-04-01T09:00:00Z"))
            .await
            .unwrap();
        memory
            .capture_shot(approach(3, "8 iron", 132.0, "2024-04-02T09:00:00Z"))
            .await
            .unwrap();
        memory
            .capture_shot(approach(11, "PW", 151.0, "2024-04-03T09:00:00Z"))
            .await
            .unwrap();

        let insights = memory.course_intelligence("torrey-south").await;
        assert_eq!(insights.most_played_holes, vec![3, 11]);
        assert_eq!(insights.club_insights[0].club, "8 iron");
        assert_eq!(insights.club_insights[0].note, "hits short");
        assert_eq!(insights.club_insights[1].note, "matches profile");
        assert_eq!(insights.hole_details.len(), 2);
        assert!(insights.tricky_holes.iter().all(|t| t.note.contains("uphill")));

        let json = serde_json::to_value(&insights.hole_details[0].shots[0]).unwrap();
        assert!(json.get("imageUrl").is_none());
    }

    #[tokio::test]
    async fn test_unknown_course_is_empty() {
        let memory = memory();
        let insights = memory.course_intelligence("nowhere").await;
        assert_eq!(insights, CourseInsights::empty("nowhere"));
        assert!(memory.history_context(&RelevanceQuery::new("nowhere", 1)).await.is_none());
    }

    #[tokio::test]
    async fn test_reference_distance_from_config() {
        let config = Config {
            club_reference_distance: 130,
            ..Config::default()
        };
        let memory = ShotMemory::new(ShotStore::in_memory(), config);
        memory
            .capture_shot(approach(3, "8 iron", 128.0, "2024-04-01T09:00:00Z"))
            .await
            .unwrap();
        let insights = memory.course_intelligence("torrey-south").await;
        assert_eq!(insights.club_insights[0].profile, 130);
        assert_eq!(insights.club_insights[0].note, "matches profile");
    }

    #[tokio::test]
    async fn test_file_backed_memory_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store_path: dir.path().join("shots.json"),
            ..Config::default()
        };

        let first = ShotMemory::from_config(config.clone());
        let id = first
            .capture_shot(approach(7, "6 iron", 160.0, "2024-04-01T09:00:00Z"))
            .await
            .unwrap();

        let reopened = ShotMemory::from_config(config);
        let all = reopened.get_all_shots().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].image_url.as_deref(), Some("/uploads/shot.jpg"));

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("shots.json")).unwrap()).unwrap();
        assert_eq!(raw[0]["courseId"], "torrey-south");
        assert_eq!(raw[0]["holeNumber"], 7);
        assert!(raw[0]["userFeedback"].is_null());
    }
}
