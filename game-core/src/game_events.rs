use game_types::{Choice, CountdownStep, Round, Score};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    RoundStarted {
        player_choice: Choice,
    },
    CountdownTick {
        step: CountdownStep,
    },
    ShuffleTick {
        display: Choice,
    },
    RoundResolved {
        round: Round,
        score: Score,
        streak: u32,
        headline: String,
        highlighted: Vec<Choice>,
    },
    CelebrationStarted {
        duration: Duration,
    },
    CelebrationEnded,
    RoundReset,
}

impl RoundEvent {
    /// Purely decorative frames the server may coalesce or drop.
    pub fn is_animation_frame(&self) -> bool {
        matches!(self, RoundEvent::ShuffleTick { .. })
    }
}

/// Event handler trait for observing round transitions
pub trait RoundEventHandler: Send {
    fn handle_event(&mut self, event: RoundEvent);
}

/// Simple event bus for distributing round events
pub struct RoundEventBus {
    handlers: Vec<Box<dyn RoundEventHandler>>,
}

impl RoundEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.handlers.push(handler);
    }

    #[cfg(test)]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: RoundEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for RoundEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoundEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
