use shared::Difficulty;

/// Experience needed to advance one level.
pub const XP_PER_LEVEL: i64 = 100;

/// The parts of a drawing attempt the aggregator looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptOutcome {
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub drawing_time_ms: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyTally {
    pub attempts: i64,
    pub successes: i64,
}

/// Server-computed view of one session's attempt log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub total_attempts: i32,
    pub successful_attempts: i32,
    /// Mean over every attempt, correct or not, rounded to the nearest millisecond.
    pub avg_drawing_time_ms: i32,
    pub total_drawing_time_ms: i64,
    pub streak: i32,
    pub fastest_correct_ms: Option<i32>,
    pub experience: i64,
    pub easy: DifficultyTally,
    pub medium: DifficultyTally,
    pub hard: DifficultyTally,
}

impl SessionSummary {
    /// Unrounded mean drawing time, used when merging into lifetime averages.
    pub fn exact_mean_drawing_time_ms(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.total_drawing_time_ms as f64 / f64::from(self.total_attempts)
    }

    pub fn tally(&self, difficulty: Difficulty) -> DifficultyTally {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn tally_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyTally {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Longest run of consecutive `true` values.
pub fn longest_streak<I>(flags: I) -> i32
where
    I: IntoIterator<Item = bool>,
{
    let mut current = 0;
    let mut best = 0;
    for is_correct in flags {
        if is_correct {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Summarize a session's attempts. `attempts` must already be in creation order.
pub fn summarize(attempts: &[AttemptOutcome]) -> SessionSummary {
    let mut summary = SessionSummary {
        streak: longest_streak(attempts.iter().map(|a| a.is_correct)),
        ..SessionSummary::default()
    };

    for attempt in attempts {
        summary.total_attempts += 1;
        summary.total_drawing_time_ms += i64::from(attempt.drawing_time_ms);

        let tally = summary.tally_mut(attempt.difficulty);
        tally.attempts += 1;

        if attempt.is_correct {
            tally.successes += 1;
            summary.successful_attempts += 1;
            summary.experience += attempt.difficulty.experience();
            summary.fastest_correct_ms = Some(match summary.fastest_correct_ms {
                Some(fastest) => fastest.min(attempt.drawing_time_ms),
                None => attempt.drawing_time_ms,
            });
        }
    }

    if summary.total_attempts > 0 {
        let count = i64::from(summary.total_attempts);
        summary.avg_drawing_time_ms = ((summary.total_drawing_time_ms + count / 2) / count) as i32;
    }

    summary
}

pub fn level_for_experience(experience_points: i64) -> i32 {
    (1 + experience_points.max(0) / XP_PER_LEVEL) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(is_correct: bool, drawing_time_ms: i32) -> AttemptOutcome {
        AttemptOutcome {
            difficulty: Difficulty::Easy,
            is_correct,
            drawing_time_ms,
        }
    }

    #[test]
    fn test_longest_streak_examples() {
        assert_eq!(longest_streak([true, true, false, true, true, true]), 3);
        assert_eq!(longest_streak([false, false]), 0);
        assert_eq!(longest_streak(std::iter::empty()), 0);
        assert_eq!(longest_streak([true]), 1);
        assert_eq!(longest_streak([true, true, true, false]), 3);
    }

    #[test]
    fn test_single_miss_resets_run() {
        assert_eq!(longest_streak([true, true, false, true, true]), 2);
        assert_eq!(longest_streak([true, false, true, false, true]), 1);
    }

    #[test]
    fn test_summarize_mixed_session() {
        let attempts = [
            outcome(true, 2100),
            outcome(true, 2400),
            outcome(false, 1900),
            outcome(true, 2300),
        ];

        let summary = summarize(&attempts);

        assert_eq!(summary.total_attempts, 4);
        assert_eq!(summary.successful_attempts, 3);
        assert_eq!(summary.avg_drawing_time_ms, 2175);
        assert_eq!(summary.streak, 2);
        assert_eq!(summary.fastest_correct_ms, Some(2100));
        assert_eq!(summary.experience, 30);
    }

    #[test]
    fn test_summarize_empty_session_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary, SessionSummary::default());
        assert_eq!(summary.fastest_correct_ms, None);
    }

    #[test]
    fn test_fastest_ignores_incorrect_attempts() {
        let summary = summarize(&[outcome(false, 500), outcome(true, 3000), outcome(false, 100)]);
        assert_eq!(summary.fastest_correct_ms, Some(3000));
        assert_eq!(summary.streak, 1);
    }

    #[test]
    fn test_average_rounds_to_nearest_ms() {
        let summary = summarize(&[outcome(true, 1000), outcome(true, 1001)]);
        assert_eq!(summary.avg_drawing_time_ms, 1001);
        assert!((summary.exact_mean_drawing_time_ms() - 1000.5).abs() < f64::EPSILON);

        let summary = summarize(&[outcome(true, 1000), outcome(true, 1000), outcome(true, 1001)]);
        assert_eq!(summary.avg_drawing_time_ms, 1000);
    }

    #[test]
    fn test_difficulty_tallies_and_experience() {
        let attempts = [
            AttemptOutcome { difficulty: Difficulty::Easy, is_correct: true, drawing_time_ms: 1000 },
            AttemptOutcome { difficulty: Difficulty::Medium, is_correct: false, drawing_time_ms: 1000 },
            AttemptOutcome { difficulty: Difficulty::Medium, is_correct: true, drawing_time_ms: 1000 },
            AttemptOutcome { difficulty: Difficulty::Hard, is_correct: true, drawing_time_ms: 1000 },
        ];

        let summary = summarize(&attempts);

        assert_eq!(summary.tally(Difficulty::Easy), DifficultyTally { attempts: 1, successes: 1 });
        assert_eq!(summary.tally(Difficulty::Medium), DifficultyTally { attempts: 2, successes: 1 });
        assert_eq!(summary.tally(Difficulty::Hard), DifficultyTally { attempts: 1, successes: 1 });
        assert_eq!(summary.experience, 10 + 20 + 30);
    }

    #[test]
    fn test_level_for_experience() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(99), 1);
        assert_eq!(level_for_experience(100), 2);
        assert_eq!(level_for_experience(450), 5);
        assert_eq!(level_for_experience(-5), 1);
    }
}
