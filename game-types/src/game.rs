use crate::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The choice this one defeats.
    pub fn beats(self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Scissors => Choice::Paper,
            Choice::Paper => Choice::Rock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a round from the player's point of view. `None` means no round
/// has been resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
    #[default]
    None,
}

impl Outcome {
    pub fn headline(self) -> Option<&'static str> {
        match self {
            Outcome::Win => Some("You Win"),
            Outcome::Lose => Some("You Lose"),
            Outcome::Draw => Some("It's a Draw"),
            Outcome::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Score {
    /// Add one resolved round to the matching bucket.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::None => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Scoreboard lines in display order.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Wins: {}", self.wins),
            format!("Losses: {}", self.losses),
            format!("Draws: {}", self.draws),
        ]
    }
}

/// A fully resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Round {
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub outcome: Outcome,
}

impl Round {
    /// Buttons shown as the winning hand: the player's pick on a win, the
    /// computer's pick on a loss, every button on a draw.
    pub fn highlighted(&self) -> Vec<Choice> {
        match self.outcome {
            Outcome::Win => vec![self.player_choice],
            Outcome::Lose => vec![self.computer_choice],
            Outcome::Draw => Choice::ALL.to_vec(),
            Outcome::None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundPhase {
    #[default]
    Idle,
    Counting,
    Resolved,
}

impl RoundPhase {
    /// Status line shown under the board.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            RoundPhase::Counting => Some("Computer is choosing..."),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CountdownStep {
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "GO")]
    Go,
}

impl CountdownStep {
    pub const SEQUENCE: [CountdownStep; 4] = [
        CountdownStep::Three,
        CountdownStep::Two,
        CountdownStep::One,
        CountdownStep::Go,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CountdownStep::Three => "3",
            CountdownStep::Two => "2",
            CountdownStep::One => "1",
            CountdownStep::Go => "GO",
        }
    }

    pub fn next(self) -> Option<CountdownStep> {
        match self {
            CountdownStep::Three => Some(CountdownStep::Two),
            CountdownStep::Two => Some(CountdownStep::One),
            CountdownStep::One => Some(CountdownStep::Go),
            CountdownStep::Go => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Theme implied by the system colour-scheme preference.
    pub fn from_system(prefers_light: bool) -> Theme {
        if prefers_light { Theme::Light } else { Theme::Dark }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(GameError::InvalidTheme {
                value: other.to_string(),
            }),
        }
    }
}

/// Everything the browser needs to render the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub player_choice: Option<Choice>,
    pub computer_choice: Option<Choice>,
    pub outcome: Outcome,
    pub countdown: Option<CountdownStep>,
    pub shuffle_display: Option<Choice>,
    pub score: Score,
    pub streak: u32,
    pub celebration_visible: bool,
    pub hint: Option<String>,
    pub headline: Option<String>,
    pub highlighted: Vec<Choice>,
}
