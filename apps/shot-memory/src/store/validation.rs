use crate::models::ShotRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    MissingId,
    MissingCourseId,
    MissingHoleNumber,
}

impl RecordIssue {
    pub fn describe(&self) -> &'static str {
        match self {
            RecordIssue::MissingId => "id must be non-empty",
            RecordIssue::MissingCourseId => "courseId must be non-empty",
            RecordIssue::MissingHoleNumber => "holeNumber must be a positive integer",
        }
    }
}

/// Checks the identity fields every stored record must carry.
/// Returns every issue found, not only the first.
pub fn validate_record(record: &ShotRecord) -> Vec<RecordIssue> {
    let mut issues = Vec::new();
    if record.id.trim().is_empty() {
        issues.push(RecordIssue::MissingId);
    }
    if record.course_id.trim().is_empty() {
        issues.push(RecordIssue::MissingCourseId);
    }
    if record.hole_number == 0 {
        issues.push(RecordIssue::MissingHoleNumber);
    }
    issues
}

pub fn is_valid(record: &ShotRecord) -> bool {
    validate_record(record).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_record_passes() {
        let record = ShotRecord {
            id: "a".into(),
            course_id: "c".into(),
            hole_number: 18,
            ..Default::default()
        };
        assert!(is_valid(&record));
    }

    #[test]
    fn test_reports_every_issue() {
        let issues = validate_record(&ShotRecord::default());
        assert_eq!(
            issues,
            vec![
                RecordIssue::MissingId,
                RecordIssue::MissingCourseId,
                RecordIssue::MissingHoleNumber
            ]
        );
    }

    #[test]
    fn test_whitespace_course_rejected() {
        let record = ShotRecord {
            id: "a".into(),
            course_id: "   ".into(),
            hole_number: 1,
            ..Default::default()
        };
        assert_eq!(validate_record(&record), vec![RecordIssue::MissingCourseId]);
    }
}
