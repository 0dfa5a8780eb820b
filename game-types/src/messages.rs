use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{Choice, CountdownStep, GameError, Round, RoundSnapshot, Score, Theme};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    SelectChoice { choice: Choice },
    PlayAgain,
    ToggleTheme,
    RequestState,
    Heartbeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    Welcome { session_id: Uuid, theme: Theme, state: RoundSnapshot },
    RoundStarted { player_choice: Choice },
    CountdownTick { step: CountdownStep },
    ShuffleTick { display: Choice },
    RoundResolved {
        round: Round,
        score: Score,
        streak: u32,
        headline: String,
        highlighted: Vec<Choice>,
    },
    CelebrationStarted { duration_ms: u32 },
    CelebrationEnded,
    RoundReset,
    ThemeChanged { theme: Theme },
    StateUpdate { state: RoundSnapshot },
    Pong,
    Error { error: GameError },
}
