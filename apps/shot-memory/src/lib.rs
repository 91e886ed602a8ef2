//! Shot memory core for the shot-advice backend.
//!
//! Persists every analyzed shot and its recommendation, records user
//! feedback, and derives hole-level guidance and course-wide intelligence
//! from the accumulated history. The HTTP layer calls into [`ShotMemory`]
//! and forwards results unchanged.

pub mod config;
pub mod errors;
pub mod feedback;
pub mod insights;
pub mod models;
pub mod state;
pub mod store;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::Config;
pub use errors::StoreError;
pub use feedback::{FeedbackOutcome, FeedbackSubmission};
pub use insights::RelevanceQuery;
pub use models::{CourseInsights, Feedback, NewShot, ShotRecord, ShotType};
pub use state::ShotMemory;
pub use store::ShotStore;

/// Installs the global tracing subscriber. `RUST_LOG` directives in the
/// environment win; otherwise this crate logs at `config.rust_log`.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
