pub mod insights;
pub mod shot;

pub use insights::{ClubFit, ClubInsight, CourseInsights, HoleDetail, ShotSummary, TrickyHole};
pub use shot::{Conditions, Feedback, NewShot, Recommendation, ShotContext, ShotRecord, ShotType};
