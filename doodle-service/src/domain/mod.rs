pub mod aggregator;

pub use aggregator::{
    level_for_experience, longest_streak, summarize, AttemptOutcome, DifficultyTally,
    SessionSummary, XP_PER_LEVEL,
};
