use crate::models::{Feedback, ShotRecord};

/// Helpful/off verdict counts over a set of records. Records without
/// feedback are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackTally {
    pub helpful: usize,
    pub off: usize,
}

impl FeedbackTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ShotRecord>) -> Self {
        records
            .into_iter()
            .fold(FeedbackTally::default(), |mut tally, record| {
                match record.user_feedback {
                    Some(Feedback::Helpful) => tally.helpful += 1,
                    Some(Feedback::Off) => tally.off += 1,
                    None => {}
                }
                tally
            })
    }

    pub fn total(&self) -> usize {
        self.helpful + self.off
    }

    /// Share of verdicts that were helpful, or `None` with no verdicts.
    pub fn helpful_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.helpful as f64 / total as f64),
        }
    }

    pub fn off_ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.off as f64 / total as f64),
        }
    }
}
