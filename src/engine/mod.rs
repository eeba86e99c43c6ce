//! # Turn engine
//!
//! Owns the in-progress guess, the override toggle and the append-only history, and
//! drives the board and keyboard views from that single source of truth.
//!
//! ## Lifecycle
//!
//! 1. [`TurnEngine::new`] with the board/keyboard views and the player's UTC offset
//! 2. subscribe persistence and UI observers
//! 3. [`TurnEngine::start`] with the day's shape and any saved progress
//! 4. feed key intents; [`TurnEngine::submit_guess`] talks to the [`GameServer`]
//! 5. once the game is won or lost every mutation is ignored
//!
//! A submission is split into [`TurnEngine::begin_submit`] and
//! [`TurnEngine::complete_submit`] so an event loop can await the server without
//! holding the engine. Between the two, input is locked: a second submission is
//! refused rather than racing the first.

pub mod events;

use log::{debug, info, warn};
use thiserror::Error;

use crate::client::{ClientError, GameServer, GuessRequest, GuessResponse};
use crate::keyboard::KeyIntent;
use crate::logutil::escape_log;
use crate::model::{shaped_guess_count, GameShape, SrordleAnswer};
pub use events::{EngineEvent, EngineObserver, GameOutcome, Notice, Subscribers};

/// Board rendering port.
pub trait BoardView {
    fn set_game_shape(&mut self, shape: &GameShape);
    fn set_past_guesses(&mut self, history: &[SrordleAnswer]);
    fn add_guess(&mut self, guess: &SrordleAnswer);
    fn update_current_guess(&mut self, buffer: &[char]);
    fn set_requested_full(&mut self, armed: bool);
}

/// Keyboard rendering port.
pub trait KeyboardView {
    fn set_past_guesses(&mut self, history: &[SrordleAnswer]);
    fn add_guess(&mut self, guess: &SrordleAnswer);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine already started")]
    AlreadyStarted,
    #[error("game is over")]
    GameOver,
    #[error("a guess is already being scored")]
    SubmissionPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    GameOver(GameOutcome),
}

/// Result of one submission round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Scored; the game goes on.
    Accepted,
    /// Server error or transport failure; nothing changed.
    Rejected(String),
    Won,
    Lost,
    /// Not sent: game over or another guess in flight.
    Ignored,
}

/// A guess that has been sent and is awaiting its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGuess {
    pub request: GuessRequest,
}

impl PendingGuess {
    pub fn used_override(&self) -> bool {
        self.request.use_full
    }
}

#[derive(Debug, Clone)]
struct Setup {
    shape: GameShape,
    total_full_attempts: u32,
}

pub struct TurnEngine<B, K> {
    board: B,
    keyboard: K,
    subscribers: Subscribers,
    tz_offset: i32,
    setup: Option<Setup>,
    history: Vec<SrordleAnswer>,
    buffer: Vec<char>,
    override_armed: bool,
    remaining_full_attempts: u32,
    phase: Phase,
    pending: bool,
}

impl<B: BoardView, K: KeyboardView> TurnEngine<B, K> {
    pub fn new(board: B, keyboard: K, tz_offset: i32) -> Self {
        Self {
            board,
            keyboard,
            subscribers: Subscribers::default(),
            tz_offset,
            setup: None,
            history: Vec::new(),
            buffer: Vec::new(),
            override_armed: false,
            remaining_full_attempts: 0,
            phase: Phase::Active,
            pending: false,
        }
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: EngineObserver + 'static,
    {
        self.subscribers.subscribe(observer);
    }

    pub fn on_event<F>(&mut self, f: F)
    where
        F: FnMut(&EngineEvent<'_>) + 'static,
    {
        self.subscribers.subscribe_fn(f);
    }

    /// One-time initializer. Replays `past_guesses` into both views and announces
    /// the remaining override count.
    pub fn start(
        &mut self,
        shape: GameShape,
        past_guesses: Vec<SrordleAnswer>,
        remaining_full_attempts: u32,
        total_full_attempts: u32,
    ) -> Result<(), EngineError> {
        if self.setup.is_some() {
            return Err(EngineError::AlreadyStarted);
        }
        info!(
            "starting game: {} shaped rows, {} past guesses, {}/{} overrides left",
            shape.len(),
            past_guesses.len(),
            remaining_full_attempts,
            total_full_attempts
        );

        self.board.set_game_shape(&shape);
        self.board.set_past_guesses(&past_guesses);
        self.keyboard.set_past_guesses(&past_guesses);

        let row_budget = shape.len() + total_full_attempts as usize;
        self.setup = Some(Setup {
            shape,
            total_full_attempts,
        });
        self.remaining_full_attempts = remaining_full_attempts;
        self.history = past_guesses;

        if self.history.iter().any(SrordleAnswer::is_fully_correct) {
            debug!("restored history already contains the winning guess");
            self.phase = Phase::GameOver(GameOutcome::Won);
        } else if self.history.len() >= row_budget {
            debug!("restored history already used every row");
            self.phase = Phase::GameOver(GameOutcome::Lost);
        }

        self.announce_attempts();
        Ok(())
    }

    /// Close a game that saved progress records as finished. Restored history
    /// alone cannot tell a loss on the last override apart from one still in play.
    pub fn restore_outcome(&mut self, outcome: GameOutcome) {
        if self.is_game_over() {
            return;
        }
        debug!("restored progress says the game was {:?}", outcome);
        self.phase = Phase::GameOver(outcome);
    }

    fn setup(&self) -> &Setup {
        match &self.setup {
            Some(setup) => setup,
            None => panic!("turn engine used before start(): no game shape has been set"),
        }
    }

    pub fn is_started(&self) -> bool {
        self.setup.is_some()
    }

    /// Capacity of the row being typed.
    ///
    /// # Panics
    ///
    /// Panics when called before [`TurnEngine::start`].
    pub fn current_row_length(&self) -> usize {
        let shape = &self.setup().shape;
        shape
            .row_for(shaped_guess_count(&self.history), self.override_armed)
            .active_slots()
    }

    fn accepts_input(&self) -> bool {
        if self.is_game_over() {
            return false;
        }
        if self.pending {
            debug!("input ignored while a guess is being scored");
            return false;
        }
        true
    }

    pub fn add_letter(&mut self, ch: char) {
        if !self.accepts_input() || self.buffer.len() >= self.current_row_length() {
            return;
        }
        self.buffer.push(ch);
        self.board.update_current_guess(&self.buffer);
    }

    pub fn delete_letter(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.buffer.pop();
        self.board.update_current_guess(&self.buffer);
    }

    /// Arm or disarm the full-width override. Always clears the buffer when it
    /// toggles, since the partial guess was typed against the other shape.
    pub fn toggle_override_request(&mut self) {
        if !self.accepts_input() {
            return;
        }
        if !self.override_armed && self.remaining_full_attempts == 0 {
            debug!("override not armed: no attempts remaining");
            return;
        }

        self.buffer.clear();
        self.board.update_current_guess(&self.buffer);

        self.override_armed = !self.override_armed;
        if self.override_armed {
            self.remaining_full_attempts -= 1;
        } else {
            self.remaining_full_attempts += 1;
        }
        self.announce_attempts();
        self.board.set_requested_full(self.override_armed);
    }

    /// Build the request for the buffered guess and lock input until
    /// [`TurnEngine::complete_submit`] is called.
    pub fn begin_submit(&mut self) -> Result<PendingGuess, EngineError> {
        if self.is_game_over() {
            return Err(EngineError::GameOver);
        }
        if self.pending {
            return Err(EngineError::SubmissionPending);
        }
        // Shape must exist before anything is sent.
        let _ = self.setup();

        let request = GuessRequest {
            guess: self.buffer.iter().collect(),
            tz_offset: self.tz_offset,
            use_full: self.override_armed,
            guess_index: shaped_guess_count(&self.history),
        };
        debug!(
            "submitting guess '{}' (index {}, override {})",
            escape_log(&request.guess),
            request.guess_index,
            request.use_full
        );
        self.pending = true;
        Ok(PendingGuess { request })
    }

    /// Apply the server's verdict for `pending`.
    pub fn complete_submit(
        &mut self,
        pending: PendingGuess,
        result: Result<GuessResponse, ClientError>,
    ) -> SubmitOutcome {
        self.pending = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("guess submission failed: {}", e);
                let msg = format!("Unable to reach the server: {}", e);
                self.publish_notice(Notice::Error(msg.clone()));
                return SubmitOutcome::Rejected(msg);
            }
        };
        if let Some(err) = response.error {
            info!("server rejected guess: {}", escape_log(&err));
            self.publish_notice(Notice::Error(err.clone()));
            return SubmitOutcome::Rejected(err);
        }

        let used_override = pending.used_override();
        if let Some(letter_answers) = response.answer.clone() {
            let guess = SrordleAnswer {
                letter_answers,
                requested_full: used_override,
            };
            self.board.add_guess(&guess);
            self.keyboard.add_guess(&guess);
            self.history.push(guess);

            let next_row_length = self
                .setup()
                .shape
                .row_for(shaped_guess_count(&self.history), false)
                .active_slots();
            let event = EngineEvent::GuessSubmitted {
                history: &self.history,
                next_row_length,
            };
            self.subscribers.publish(&event);
        }

        let was_armed = self.override_armed;
        self.override_armed = false;
        self.buffer.clear();
        self.board.update_current_guess(&self.buffer);
        if was_armed {
            self.board.set_requested_full(false);
        }

        let (shape_len, total) = {
            let setup = self.setup();
            (setup.shape.len(), setup.total_full_attempts as usize)
        };
        if used_override || shaped_guess_count(&self.history) >= shape_len {
            self.announce_attempts();
        }

        if response.is_win() {
            info!("game won after {} guesses", self.history.len());
            self.phase = Phase::GameOver(GameOutcome::Won);
            self.publish_notice(Notice::Won);
            return SubmitOutcome::Won;
        }
        if self.history.len() >= shape_len + total || self.remaining_full_attempts == 0 {
            info!("game lost after {} guesses", self.history.len());
            self.phase = Phase::GameOver(GameOutcome::Lost);
            self.publish_notice(Notice::Lost {
                target_word: response.target_word,
            });
            return SubmitOutcome::Lost;
        }
        SubmitOutcome::Accepted
    }

    /// Send the buffered guess to `server` and apply the answer.
    pub async fn submit_guess<S: GameServer>(&mut self, server: &S) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(e) => {
                debug!("submit ignored: {}", e);
                return SubmitOutcome::Ignored;
            }
        };
        let result = server.submit_guess(pending.request.clone()).await;
        self.complete_submit(pending, result)
    }

    /// Route a key intent from the keyboard. Only `Submit` returns an outcome.
    pub async fn dispatch<S: GameServer>(
        &mut self,
        intent: KeyIntent,
        server: &S,
    ) -> Option<SubmitOutcome> {
        match intent {
            KeyIntent::Letter(ch) => {
                self.add_letter(ch);
                None
            }
            KeyIntent::Delete => {
                self.delete_letter();
                None
            }
            KeyIntent::Submit => Some(self.submit_guess(server).await),
        }
    }

    fn announce_attempts(&mut self) {
        let event = EngineEvent::AttemptsChanged {
            remaining: self.remaining_full_attempts,
            override_armed: self.override_armed,
        };
        self.subscribers.publish(&event);
    }

    fn publish_notice(&mut self, notice: Notice) {
        self.subscribers.publish(&EngineEvent::Notice(&notice));
    }

    pub fn history(&self) -> &[SrordleAnswer] {
        &self.history
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn shape(&self) -> Option<&GameShape> {
        self.setup.as_ref().map(|s| &s.shape)
    }

    pub fn is_override_armed(&self) -> bool {
        self.override_armed
    }

    pub fn remaining_full_attempts(&self) -> u32 {
        self.remaining_full_attempts
    }

    pub fn total_full_attempts(&self) -> u32 {
        self.setup.as_ref().map_or(0, |s| s.total_full_attempts)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn is_submission_pending(&self) -> bool {
        self.pending
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }
}
