#![allow(dead_code)]

use game_core::{RoundController, RoundEvent, RoundEventHandler, RoundTiming, ScriptedChoices};
use game_types::Choice;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Creates a controller whose computer plays the given moves in order
pub fn create_scripted_controller(script: &[Choice]) -> RoundController {
    RoundController::new(
        Box::new(ScriptedChoices::new(script.to_vec())),
        RoundTiming::default(),
    )
}

/// Creates a scripted controller with an attached event collector
pub fn create_observed_controller(script: &[Choice]) -> (RoundController, EventCollector) {
    let mut controller = create_scripted_controller(script);
    let collector = EventCollector::new();
    controller.add_handler(Box::new(collector.clone()));
    (controller, collector)
}

/// Plays one full round starting at `start` and returns the time it resolved
pub fn play_round(controller: &mut RoundController, choice: Choice, start: Duration) -> Duration {
    controller
        .select_choice(choice, start)
        .expect("controller should be idle");
    let resolved_at = start + controller.timing().countdown_total();
    controller.advance(resolved_at);
    resolved_at
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<RoundEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count_matching(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl RoundEventHandler for EventCollector {
    fn handle_event(&mut self, event: RoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}
