use game_types::{Outcome, Score};

/// Consecutive wins needed for a celebration.
pub const CELEBRATION_STREAK: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinStreak {
    count: u32,
    threshold: u32,
}

impl WinStreak {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns true when this outcome completes a streak. The counter starts
    /// over at zero in that case.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Win => {
                self.count += 1;
                if self.count >= self.threshold {
                    self.count = 0;
                    return true;
                }
                false
            }
            Outcome::Lose | Outcome::Draw => {
                self.count = 0;
                false
            }
            Outcome::None => false,
        }
    }
}

impl Default for WinStreak {
    fn default() -> Self {
        Self::new(CELEBRATION_STREAK)
    }
}

/// Session score together with the running win streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTally {
    pub score: Score,
    pub streak: WinStreak,
}

impl RoundTally {
    pub fn new(streak_threshold: u32) -> Self {
        Self {
            score: Score::default(),
            streak: WinStreak::new(streak_threshold),
        }
    }

    /// Apply one resolved outcome. Returns true if a celebration is due.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        self.score.record(outcome);
        self.streak.record(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_wins_celebrate_once() {
        let mut streak = WinStreak::default();
        assert!(!streak.record(Outcome::Win));
        assert!(!streak.record(Outcome::Win));
        assert!(streak.record(Outcome::Win));
        assert_eq!(streak.count(), 0);
        assert!(!streak.record(Outcome::Win));
        assert_eq!(streak.count(), 1);
    }

    #[test]
    fn test_non_win_resets_streak() {
        let mut streak = WinStreak::default();
        streak.record(Outcome::Win);
        streak.record(Outcome::Win);
        assert!(!streak.record(Outcome::Draw));
        assert_eq!(streak.count(), 0);

        streak.record(Outcome::Win);
        assert!(!streak.record(Outcome::Lose));
        assert_eq!(streak.count(), 0);
    }

    #[test]
    fn test_tally_counts_every_round() {
        let mut tally = RoundTally::default();
        let outcomes = [
            Outcome::Win,
            Outcome::Lose,
            Outcome::Draw,
            Outcome::Win,
            Outcome::Win,
            Outcome::Win,
        ];

        let celebrations = outcomes.iter().filter(|o| tally.record(**o)).count();

        assert_eq!(celebrations, 1);
        assert_eq!(tally.score.total(), outcomes.len() as u32);
        assert_eq!(tally.score.wins, 4);
        assert_eq!(tally.score.losses, 1);
        assert_eq!(tally.score.draws, 1);
        assert_eq!(tally.streak.count(), 0);
    }
}
