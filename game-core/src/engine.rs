use game_types::{Choice, Outcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Outcome of `player` against `computer`, from the player's side.
pub fn decide(player: Choice, computer: Choice) -> Outcome {
    if player == computer {
        Outcome::Draw
    } else if player.beats() == computer {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Uniform draw over the three choices.
pub fn random_choice<R: Rng + ?Sized>(rng: &mut R) -> Choice {
    Choice::ALL[rng.random_range(0..Choice::ALL.len())]
}

/// Supplies the computer's move when a round resolves.
pub trait ChoiceSource {
    fn next_choice(&mut self) -> Choice;
}

pub struct RandomChoices<R = StdRng> {
    rng: R,
}

impl RandomChoices<StdRng> {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomChoices<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ChoiceSource for RandomChoices<R> {
    fn next_choice(&mut self) -> Choice {
        random_choice(&mut self.rng)
    }
}

/// Plays back a fixed list of moves, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ScriptedChoices {
    queue: VecDeque<Choice>,
    last: Choice,
}

impl ScriptedChoices {
    pub fn new(choices: impl IntoIterator<Item = Choice>) -> Self {
        let queue: VecDeque<Choice> = choices.into_iter().collect();
        let last = queue.back().copied().unwrap_or(Choice::Rock);
        Self { queue, last }
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ChoiceSource for ScriptedChoices {
    fn next_choice(&mut self) -> Choice {
        self.queue.pop_front().unwrap_or(self.last)
    }
}
