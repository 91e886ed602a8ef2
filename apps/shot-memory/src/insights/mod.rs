// Insight engine: relevance matching, narrative synthesis, course intelligence.
// Pure functions over loaded records; no storage access here.

pub mod course;
pub mod narrative;
pub mod policy;
pub mod prompts;
pub mod relevance;
pub mod tally;

pub use course::compute_course_insights;
pub use narrative::generate_insight_narrative;
pub use prompts::format_history_context;
pub use relevance::{find_relevant, RelevanceQuery};
pub use tally::FeedbackTally;
