use crate::{
    ChoiceSource, RoundEvent, RoundEventBus, RoundEventHandler, RoundTally, TimerKind, TimerSet,
    decide, CELEBRATION_STREAK,
};
use game_types::{Choice, CountdownStep, Outcome, Round, RoundPhase, RoundSnapshot, Score};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("a round is already counting down")]
    RoundInProgress,
    #[error("the last round must be reset before choosing again")]
    AwaitingReset,
    #[error("there is no resolved round to reset")]
    NotResolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTiming {
    /// Time between countdown steps ("3" → "2" → "1" → "GO").
    pub countdown_step: Duration,
    pub shuffle_interval: Duration,
    pub celebration: Duration,
    pub streak_threshold: u32,
}

impl RoundTiming {
    /// Time from accepting a choice to resolving the round.
    pub fn countdown_total(&self) -> Duration {
        self.countdown_step * CountdownStep::SEQUENCE.len() as u32
    }
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            countdown_step: Duration::from_millis(500),
            shuffle_interval: Duration::from_millis(180),
            celebration: Duration::from_millis(4000),
            streak_threshold: CELEBRATION_STREAK,
        }
    }
}

/// Drives one player's rounds. Time is a logical clock supplied by the
/// caller (elapsed time since the session began); the controller never
/// sleeps. Callers feed the clock in through [`RoundController::advance`]
/// and can ask [`RoundController::next_deadline`] when to do so next.
pub struct RoundController {
    phase: RoundPhase,
    player_choice: Option<Choice>,
    computer_choice: Option<Choice>,
    outcome: Outcome,
    countdown: Option<CountdownStep>,
    shuffle_display: Option<Choice>,
    shuffle_frame: usize,
    tally: RoundTally,
    celebration_visible: bool,
    timers: TimerSet,
    timing: RoundTiming,
    source: Box<dyn ChoiceSource + Send>,
    event_bus: RoundEventBus,
}

impl RoundController {
    pub fn new(source: Box<dyn ChoiceSource + Send>, timing: RoundTiming) -> Self {
        Self {
            phase: RoundPhase::Idle,
            player_choice: None,
            computer_choice: None,
            outcome: Outcome::None,
            countdown: None,
            shuffle_display: None,
            shuffle_frame: 0,
            tally: RoundTally::new(timing.streak_threshold),
            celebration_visible: false,
            timers: TimerSet::new(),
            timing,
            source,
            event_bus: RoundEventBus::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    /// Accept the player's hand and start the countdown. Only valid while
    /// idle; otherwise nothing changes.
    pub fn select_choice(&mut self, choice: Choice, now: Duration) -> Result<(), RoundError> {
        match self.phase {
            RoundPhase::Idle => {}
            RoundPhase::Counting => {
                debug!("Ignoring {:?}: round already counting down", choice);
                return Err(RoundError::RoundInProgress);
            }
            RoundPhase::Resolved => {
                debug!("Ignoring {:?}: previous round not reset", choice);
                return Err(RoundError::AwaitingReset);
            }
        }

        self.timers.cancel_round();

        self.phase = RoundPhase::Counting;
        self.player_choice = Some(choice);
        self.computer_choice = None;
        self.outcome = Outcome::None;
        self.countdown = Some(CountdownStep::Three);
        self.shuffle_frame = 0;
        self.shuffle_display = Some(Choice::ALL[0]);

        let mut step = CountdownStep::Three;
        let mut at = now;
        while let Some(next) = step.next() {
            at += self.timing.countdown_step;
            self.timers.schedule(at, TimerKind::CountdownTick(next));
            step = next;
        }
        self.timers.schedule(at + self.timing.countdown_step, TimerKind::Resolve);
        self.timers
            .schedule(now + self.timing.shuffle_interval, TimerKind::ShuffleTick);

        debug!("Round started with {:?}", choice);
        self.event_bus.publish(RoundEvent::RoundStarted {
            player_choice: choice,
        });
        self.event_bus.publish(RoundEvent::CountdownTick {
            step: CountdownStep::Three,
        });
        self.event_bus.publish(RoundEvent::ShuffleTick {
            display: Choice::ALL[0],
        });

        Ok(())
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance(&mut self, now: Duration) {
        while let Some(timer) = self.timers.pop_due(now) {
            self.fire(timer.kind, timer.due);
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Return to idle after a resolved round.
    pub fn play_again(&mut self) -> Result<(), RoundError> {
        if self.phase != RoundPhase::Resolved {
            debug!("Ignoring play again in phase {:?}", self.phase);
            return Err(RoundError::NotResolved);
        }

        self.timers.cancel_round();
        self.clear_round();
        self.event_bus.publish(RoundEvent::RoundReset);
        Ok(())
    }

    /// Cancel everything. Nothing fires after this returns.
    pub fn teardown(&mut self) {
        let cancelled = self.timers.clear();
        self.clear_round();
        self.celebration_visible = false;
        debug!("Round controller torn down, {} timers cancelled", cancelled);
    }

    fn clear_round(&mut self) {
        self.phase = RoundPhase::Idle;
        self.player_choice = None;
        self.computer_choice = None;
        self.outcome = Outcome::None;
        self.countdown = None;
        self.shuffle_display = None;
        self.shuffle_frame = 0;
    }

    fn fire(&mut self, kind: TimerKind, due: Duration) {
        match kind {
            TimerKind::CountdownTick(step) => {
                if self.phase != RoundPhase::Counting {
                    return;
                }
                self.countdown = Some(step);
                self.event_bus.publish(RoundEvent::CountdownTick { step });
            }
            TimerKind::ShuffleTick => {
                if self.phase != RoundPhase::Counting {
                    return;
                }
                self.shuffle_frame = (self.shuffle_frame + 1) % Choice::ALL.len();
                let display = Choice::ALL[self.shuffle_frame];
                self.shuffle_display = Some(display);
                self.timers
                    .schedule(due + self.timing.shuffle_interval, TimerKind::ShuffleTick);
                self.event_bus.publish(RoundEvent::ShuffleTick { display });
            }
            TimerKind::Resolve => self.resolve(due),
            TimerKind::DismissCelebration => {
                self.celebration_visible = false;
                debug!("Celebration dismissed");
                self.event_bus.publish(RoundEvent::CelebrationEnded);
            }
        }
    }

    fn resolve(&mut self, at: Duration) {
        let Some(player_choice) = self.player_choice else {
            return;
        };
        if self.phase != RoundPhase::Counting {
            return;
        }

        self.timers.cancel_round();

        let computer_choice = self.source.next_choice();
        let outcome = decide(player_choice, computer_choice);
        let celebrate = self.tally.record(outcome);

        self.phase = RoundPhase::Resolved;
        self.computer_choice = Some(computer_choice);
        self.outcome = outcome;
        self.countdown = None;
        self.shuffle_display = None;

        info!(
            "Round resolved: {:?} vs {:?} -> {:?} (score {:?})",
            player_choice, computer_choice, outcome, self.tally.score
        );

        let round = Round {
            player_choice,
            computer_choice,
            outcome,
        };
        self.event_bus.publish(RoundEvent::RoundResolved {
            round,
            score: self.tally.score,
            streak: self.tally.streak.count(),
            headline: outcome.headline().unwrap_or_default().to_string(),
            highlighted: round.highlighted(),
        });

        if celebrate {
            self.start_celebration(at);
        }
    }

    /// Show the overlay for the configured window. A celebration that is
    /// already showing has its window restarted.
    fn start_celebration(&mut self, at: Duration) {
        self.timers.cancel(TimerKind::DismissCelebration);
        self.timers
            .schedule(at + self.timing.celebration, TimerKind::DismissCelebration);
        self.celebration_visible = true;

        info!("Win streak reached, celebrating");
        self.event_bus.publish(RoundEvent::CelebrationStarted {
            duration: self.timing.celebration,
        });
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn player_choice(&self) -> Option<Choice> {
        self.player_choice
    }

    pub fn computer_choice(&self) -> Option<Choice> {
        self.computer_choice
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn countdown(&self) -> Option<CountdownStep> {
        self.countdown
    }

    pub fn shuffle_display(&self) -> Option<Choice> {
        self.shuffle_display
    }

    pub fn score(&self) -> Score {
        self.tally.score
    }

    pub fn streak(&self) -> u32 {
        self.tally.streak.count()
    }

    pub fn celebration_visible(&self) -> bool {
        self.celebration_visible
    }

    pub fn timing(&self) -> RoundTiming {
        self.timing
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The resolved round, if one is on the board.
    pub fn last_round(&self) -> Option<Round> {
        match (self.phase, self.player_choice, self.computer_choice) {
            (RoundPhase::Resolved, Some(player_choice), Some(computer_choice)) => Some(Round {
                player_choice,
                computer_choice,
                outcome: self.outcome,
            }),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            player_choice: self.player_choice,
            computer_choice: self.computer_choice,
            outcome: self.outcome,
            countdown: self.countdown,
            shuffle_display: self.shuffle_display,
            score: self.tally.score,
            streak: self.tally.streak.count(),
            celebration_visible: self.celebration_visible,
            hint: self.phase.hint().map(str::to_string),
            headline: self.outcome.headline().map(str::to_string),
            highlighted: self
                .last_round()
                .map(|round| round.highlighted())
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for RoundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundController")
            .field("phase", &self.phase)
            .field("player_choice", &self.player_choice)
            .field("computer_choice", &self.computer_choice)
            .field("outcome", &self.outcome)
            .field("score", &self.tally.score)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
