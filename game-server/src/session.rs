use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace};
use uuid::Uuid;

use game_core::{
    PreferenceStore, RandomChoices, RoundController, RoundEvent, RoundEventHandler, RoundTiming,
    ThemeController,
};
use game_types::{ClientMessage, ServerMessage, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session knobs taken from the server config.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub timing: RoundTiming,
    pub theme_key: String,
    pub default_theme: Theme,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timing: RoundTiming::default(),
            theme_key: game_core::DEFAULT_THEME_KEY.to_string(),
            default_theme: Theme::Dark,
        }
    }
}

struct EventForwarder {
    sender: mpsc::UnboundedSender<RoundEvent>,
}

impl RoundEventHandler for EventForwarder {
    fn handle_event(&mut self, event: RoundEvent) {
        // The receiver lives in the same session; a send can only fail while
        // the session is being dropped.
        let _ = self.sender.send(event);
    }
}

/// One browser's game: owns the round controller and the theme, and turns
/// the controller's deadlines into tokio sleeps.
pub struct GameSession {
    id: SessionId,
    rounds: RoundController,
    theme: ThemeController,
    events: mpsc::UnboundedReceiver<RoundEvent>,
    started: Instant,
}

impl GameSession {
    pub fn new(mut rounds: RoundController, theme: ThemeController) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        rounds.add_handler(Box::new(EventForwarder { sender }));

        Self {
            id: SessionId::new(),
            rounds,
            theme,
            events,
            started: Instant::now(),
        }
    }

    /// Build a session with a randomly playing computer. `prefers_light` is
    /// the browser's colour-scheme preference, if it sent one.
    pub async fn open(
        settings: &SessionSettings,
        store: Arc<dyn PreferenceStore>,
        prefers_light: Option<bool>,
    ) -> Self {
        let system_default = prefers_light
            .map(Theme::from_system)
            .unwrap_or(settings.default_theme);
        let theme = ThemeController::load(store, settings.theme_key.clone(), system_default).await;
        let rounds = RoundController::new(Box::new(RandomChoices::from_os_rng()), settings.timing);

        Self::new(rounds, theme)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn rounds(&self) -> &RoundController {
        &self.rounds
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.started)
    }

    /// Serve the session until the client goes away. Every pending timer is
    /// cancelled before this returns.
    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<ClientMessage>,
        outbound: mpsc::UnboundedSender<ServerMessage>,
    ) {
        info!("Session {} started", self.id);

        let welcome = ServerMessage::Welcome {
            session_id: self.id.as_uuid(),
            theme: self.theme.theme(),
            state: self.rounds.snapshot(),
        };

        if outbound.send(welcome).is_ok() {
            loop {
                let deadline = self.rounds.next_deadline().map(|d| self.started + d);

                let reply = tokio::select! {
                    message = inbound.recv() => match message {
                        Some(message) => self.handle_message(message).await,
                        None => break,
                    },
                    _ = sleep_until_deadline(deadline) => {
                        let now = self.elapsed();
                        self.rounds.advance(now);
                        None
                    }
                };

                if !self.flush(&outbound, reply) {
                    debug!("Session {} outbound closed", self.id);
                    break;
                }
            }
        }

        self.rounds.teardown();
        info!(
            "Session {} ended with score {:?}",
            self.id,
            self.rounds.score()
        );
    }

    /// Apply one client message. Returns a direct reply, if any.
    pub async fn handle_message(&mut self, message: ClientMessage) -> Option<ServerMessage> {
        let now = self.elapsed();
        self.rounds.advance(now);

        match message {
            ClientMessage::SelectChoice { choice } => {
                if let Err(e) = self.rounds.select_choice(choice, now) {
                    debug!("Session {} ignored choice {:?}: {}", self.id, choice, e);
                }
                None
            }
            ClientMessage::PlayAgain => {
                if let Err(e) = self.rounds.play_again() {
                    debug!("Session {} ignored play again: {}", self.id, e);
                }
                None
            }
            ClientMessage::ToggleTheme => {
                let theme = self.theme.toggle().await;
                debug!("Session {} switched to {} theme", self.id, theme);
                Some(ServerMessage::ThemeChanged { theme })
            }
            ClientMessage::RequestState => Some(ServerMessage::StateUpdate {
                state: self.rounds.snapshot(),
            }),
            ClientMessage::Heartbeat => Some(ServerMessage::Pong),
        }
    }

    /// Send queued round events, then the reply. Returns false once the
    /// client side has hung up.
    fn flush(
        &mut self,
        outbound: &mpsc::UnboundedSender<ServerMessage>,
        reply: Option<ServerMessage>,
    ) -> bool {
        while let Ok(event) = self.events.try_recv() {
            if event.is_animation_frame() {
                trace!("Session {} event {:?}", self.id, event);
            } else {
                debug!("Session {} event {:?}", self.id, event);
            }
            if outbound.send(event_to_message(event)).is_err() {
                return false;
            }
        }

        match reply {
            Some(message) => outbound.send(message).is_ok(),
            None => !outbound.is_closed(),
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

pub fn event_to_message(event: RoundEvent) -> ServerMessage {
    match event {
        RoundEvent::RoundStarted { player_choice } => ServerMessage::RoundStarted { player_choice },
        RoundEvent::CountdownTick { step } => ServerMessage::CountdownTick { step },
        RoundEvent::ShuffleTick { display } => ServerMessage::ShuffleTick { display },
        RoundEvent::RoundResolved {
            round,
            score,
            streak,
            headline,
            highlighted,
        } => ServerMessage::RoundResolved {
            round,
            score,
            streak,
            headline,
            highlighted,
        },
        RoundEvent::CelebrationStarted { duration } => ServerMessage::CelebrationStarted {
            duration_ms: u32::try_from(duration.as_millis()).unwrap_or(u32::MAX),
        },
        RoundEvent::CelebrationEnded => ServerMessage::CelebrationEnded,
        RoundEvent::RoundReset => ServerMessage::RoundReset,
    }
}
