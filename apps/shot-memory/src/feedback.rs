use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::models::{Feedback, ShotRecord};
use crate::store::ShotStore;

/// A feedback verdict as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    /// Shot the verdict is about. Absent (or empty) creates a feedback-only record.
    #[serde(default)]
    pub shot_id: Option<String>,
    pub course_id: String,
    pub hole_number: u32,
    #[serde(default)]
    pub suggested_club: Option<String>,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// Existing shot updated.
    Updated { shot_id: String },
    /// Referenced shot does not exist; nothing written.
    NotFound { shot_id: String },
    /// Standalone feedback-only record appended.
    Recorded { shot_id: String },
    /// The store could not be read or written. Logged; the caller still acknowledges.
    StorageFailed { reason: String },
}

impl FeedbackOutcome {
    /// False only when storage failed. An unknown shot id counts as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, FeedbackOutcome::StorageFailed { .. })
    }
}

/// Applies a feedback verdict. Never returns an error: storage failures are
/// logged and reported through `FeedbackOutcome::StorageFailed`.
pub async fn submit_feedback(
    store: &ShotStore,
    submission: FeedbackSubmission,
) -> FeedbackOutcome {
    let FeedbackSubmission {
        shot_id,
        course_id,
        hole_number,
        suggested_club,
        feedback,
    } = submission;

    match shot_id.filter(|id| !id.trim().is_empty()) {
        Some(shot_id) => match store.update_feedback(&shot_id, feedback, Utc::now()).await {
            Ok(true) => FeedbackOutcome::Updated { shot_id },
            Ok(false) => {
                info!(shot_id = %shot_id, "Feedback for unknown shot ignored");
                FeedbackOutcome::NotFound { shot_id }
            }
            Err(e) => {
                error!(shot_id = %shot_id, error = %e, "Failed to store feedback");
                FeedbackOutcome::StorageFailed {
                    reason: e.to_string(),
                }
            }
        },
        None => {
            let record =
                ShotRecord::feedback_only(course_id, hole_number, suggested_club, feedback);
            match store.append(record).await {
                Ok(shot_id) => {
                    info!(
                        shot_id = %shot_id,
                        feedback = feedback.as_str(),
                        "Recorded feedback-only shot"
                    );
                    FeedbackOutcome::Recorded { shot_id }
                }
                Err(e) => {
                    error!(error = %e, "Failed to record feedback-only shot");
                    FeedbackOutcome::StorageFailed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::errors::StoreError;
    use crate::store::DocumentBackend;

    fn submission(shot_id: Option<&str>, feedback: Feedback) -> FeedbackSubmission {
        FeedbackSubmission {
            shot_id: shot_id.map(str::to_string),
            course_id: "c1".into(),
            hole_number: 6,
            suggested_club: Some("9 iron".into()),
            feedback,
        }
    }

    struct BrokenBackend;

    #[async_trait]
    impl DocumentBackend for BrokenBackend {
        async fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(None)
        }
        async fn save(&self, _bytes: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn describe(&self) -> String {
            "broken".into()
        }
    }

    #[tokio::test]
    async fn test_updates_existing_shot() {
        let store = ShotStore::in_memory();
        let id = store
            .append(ShotRecord {
                id: "s1".into(),
                course_id: "c1".into(),
                hole_number: 6,
                ..Default::default()
            })
            .await
            .unwrap();

        let outcome = submit_feedback(&store, submission(Some(&id), Feedback::Helpful)).await;
        assert_eq!(outcome, FeedbackOutcome::Updated { shot_id: id });
        assert_eq!(
            store.get_all().await.unwrap()[0].user_feedback,
            Some(Feedback::Helpful)
        );
    }

    #[tokio::test]
    async fn test_unknown_shot_is_success_without_append() {
        let store = ShotStore::in_memory();
        let outcome = submit_feedback(&store, submission(Some("nonexistent"), Feedback::Off)).await;
        assert!(outcome.is_success());
        assert!(matches!(outcome, FeedbackOutcome::NotFound { .. }));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_shot_id_creates_feedback_only_record() {
        let store = ShotStore::in_memory();
        let outcome = submit_feedback(&store, submission(None, Feedback::Off)).await;
        let FeedbackOutcome::Recorded { shot_id } = &outcome else {
            panic!("unexpected outcome {outcome:?}");
        };

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        let record = &all[0];
        assert_eq!(&record.id, shot_id);
        assert_eq!(record.hole_number, 6);
        assert_eq!(record.club_used.as_deref(), Some("9 iron"));
        assert_eq!(record.user_feedback, Some(Feedback::Off));
        assert!(record.is_feedback_only());
    }

    #[tokio::test]
    async fn test_empty_shot_id_treated_as_absent() {
        let store = ShotStore::in_memory();
        let outcome = submit_feedback(&store, submission(Some(""), Feedback::Helpful)).await;
        assert!(matches!(outcome, FeedbackOutcome::Recorded { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported_not_raised() {
        let store = ShotStore::new(Arc::new(BrokenBackend));
        let outcome = submit_feedback(&store, submission(None, Feedback::Helpful)).await;
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            FeedbackOutcome::StorageFailed { ref reason } if reason.contains("disk full")
        ));
    }
}
