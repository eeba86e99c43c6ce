//! # Game session
//!
//! Wires one day's game together: fetch the puzzle, restore saved progress, build
//! the [`TurnEngine`] and hang persistence, the override control panel and the
//! notice queue off its events.
//!
//! ## Startup
//!
//! 1. `POST /api/srordle` with the player's UTC offset
//! 2. an `Error`, or a response with no `Game`, ends the session before it starts
//! 3. saved guesses and the override counter are loaded for the [`GameDate`]
//! 4. subscribers are registered, then the engine is started
//!
//! ## Usage
//!
//! ```rust,no_run
//! use srordle::client::HttpGameServer;
//! use srordle::config::Config;
//! use srordle::session::Session;
//! use srordle::storage::{AnyStore, GameDate, ProgressStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let server = HttpGameServer::new(&config.server)?;
//!     let store = AnyStore::open(&config.storage.backend, &config.storage.data_dir)?;
//!     let mut session =
//!         Session::open(server, ProgressStore::new(store), GameDate::today()).await?;
//!     session.handle_line("apple").await;
//!     print!("{}", session.paint(false));
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use log::{debug, error, info};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::board::BoardModel;
use crate::client::{GameRequest, GameServer};
use crate::engine::{EngineEvent, Notice, SubmitOutcome, TurnEngine};
use crate::keyboard::{KeyIntent, KeyboardModel};
use crate::logutil::escape_log;
use crate::model::WORD_LENGTH;
use crate::storage::{GameDate, KeyValueStore, ProgressRecorder, ProgressStore};

pub const HELP_TEXT: &str = "\
Type a word and press Enter to guess it.
  !   arm or disarm the 7-letter override
  -   delete the last letter
  ?   show this help
  q   quit";

/// Label and remaining-count text for the full-width override control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePanel {
    pub visible: bool,
    pub enabled: bool,
    pub label: String,
    pub remaining_text: String,
    remaining: u32,
    armed: bool,
    row_is_full: bool,
}

impl Default for OverridePanel {
    fn default() -> Self {
        Self {
            visible: false,
            enabled: true,
            label: "Attempt 7-Letter Guess".to_string(),
            remaining_text: String::new(),
            remaining: 0,
            armed: false,
            row_is_full: false,
        }
    }
}

impl OverridePanel {
    pub fn on_event(&mut self, event: &EngineEvent<'_>) {
        match event {
            EngineEvent::GuessSubmitted {
                next_row_length, ..
            } => {
                self.visible = true;
                self.row_is_full = *next_row_length == WORD_LENGTH;
            }
            EngineEvent::AttemptsChanged {
                remaining,
                override_armed,
            } => {
                self.remaining = *remaining;
                self.armed = *override_armed;
                self.label = if *remaining == 0 && !*override_armed {
                    "No attempts remaining".to_string()
                } else if *override_armed {
                    "Unattempt 7-Letter Guess".to_string()
                } else {
                    "Attempt 7-Letter Guess".to_string()
                };
                self.remaining_text = remaining_text(*remaining);
            }
            EngineEvent::Notice(_) => return,
        }
        self.refresh_enabled();
    }

    /// Record whether the unarmed row being typed is already full width.
    pub fn set_row_is_full(&mut self, full: bool) {
        self.row_is_full = full;
        self.refresh_enabled();
    }

    // An armed override can always be given back.
    fn refresh_enabled(&mut self) {
        self.enabled = self.armed || (self.remaining > 0 && !self.row_is_full);
    }

    /// One line for the terminal, or `None` while hidden.
    pub fn render(&self) -> Option<String> {
        if !self.visible {
            return None;
        }
        let mut line = if self.enabled {
            format!("[!] {}", self.label)
        } else {
            format!("[ ] {}", self.label)
        };
        if !self.remaining_text.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.remaining_text);
        }
        Some(line)
    }
}

pub fn remaining_text(remaining: u32) -> String {
    match remaining {
        0 => String::new(),
        1 => "One remaining".to_string(),
        2 => "Two remaining".to_string(),
        n => format!("{} remaining", n),
    }
}

/// What the caller should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Continue(Option<SubmitOutcome>),
    Help,
    Quit,
}

pub struct Session<S> {
    server: S,
    day: GameDate,
    engine: TurnEngine<BoardModel, KeyboardModel>,
    panel: Rc<RefCell<OverridePanel>>,
    notices: Rc<RefCell<VecDeque<Notice>>>,
}

impl<S: GameServer> Session<S> {
    /// Fetch today's game and start the engine from saved progress.
    pub async fn open<K>(server: S, progress: ProgressStore<K>, day: GameDate) -> Result<Self>
    where
        K: KeyValueStore + 'static,
    {
        let response = server
            .fetch_game(GameRequest {
                tz_offset: day.tz_offset(),
            })
            .await
            .context("Failed to fetch today's game")?;
        if let Some(err) = response.error {
            error!("game fetch rejected: {}", escape_log(&err));
            return Err(anyhow!(err));
        }
        let game = response
            .game
            .ok_or_else(|| anyhow!("No game was returned"))?;

        let past_guesses = progress.load_past_guesses(&day);
        let remaining = progress.load_remaining_attempts(&day, game.full_attempts);
        let finished = progress.load_outcome(&day);
        info!("loaded {} saved guesses for {}", past_guesses.len(), day);

        let panel = Rc::new(RefCell::new(OverridePanel {
            visible: !past_guesses.is_empty(),
            ..OverridePanel::default()
        }));
        let notices = Rc::new(RefCell::new(VecDeque::new()));

        let mut engine = TurnEngine::new(BoardModel::new(), KeyboardModel::new(), day.tz_offset());
        engine.subscribe(ProgressRecorder::new(progress, day));
        let panel_sink = panel.clone();
        engine.on_event(move |event| panel_sink.borrow_mut().on_event(event));
        let notice_sink = notices.clone();
        engine.on_event(move |event| {
            if let EngineEvent::Notice(notice) = event {
                debug!("notice: {}", escape_log(&notice.headline()));
                notice_sink.borrow_mut().push_back((*notice).clone());
            }
        });

        engine.start(game.shape, past_guesses, remaining, game.full_attempts)?;
        if let Some(outcome) = finished {
            engine.restore_outcome(outcome);
        }
        panel
            .borrow_mut()
            .set_row_is_full(engine.current_row_length() == WORD_LENGTH);

        Ok(Self {
            server,
            day,
            engine,
            panel,
            notices,
        })
    }

    pub async fn press(&mut self, intent: KeyIntent) -> Option<SubmitOutcome> {
        self.engine.dispatch(intent, &self.server).await
    }

    /// Arm or disarm the override, unless the control is disabled.
    pub fn toggle_override(&mut self) {
        if !self.panel.borrow().enabled {
            debug!("override control is disabled");
            return;
        }
        self.engine.toggle_override_request();
    }

    /// Apply one line of terminal input: a word replaces the buffer and is
    /// submitted, `!` toggles the override, `-` deletes, `?` asks for help, `q`
    /// quits. An empty line submits whatever is buffered.
    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        match line.trim() {
            "q" | "quit" => LineOutcome::Quit,
            "?" | "help" => LineOutcome::Help,
            "!" => {
                self.toggle_override();
                LineOutcome::Continue(None)
            }
            "-" => {
                self.press(KeyIntent::Delete).await;
                LineOutcome::Continue(None)
            }
            "" => LineOutcome::Continue(self.press(KeyIntent::Submit).await),
            word => {
                // A new word replaces whatever a rejected guess left behind.
                for _ in 0..self.engine.buffer().len() {
                    self.press(KeyIntent::Delete).await;
                }
                let mut buf = [0u8; 4];
                for ch in word.chars() {
                    match KeyIntent::from_key_name(ch.encode_utf8(&mut buf)) {
                        Some(intent @ KeyIntent::Letter(_)) => {
                            self.press(intent).await;
                        }
                        _ => debug!("ignoring input character {:?}", ch),
                    }
                }
                LineOutcome::Continue(self.press(KeyIntent::Submit).await)
            }
        }
    }

    /// Notices raised since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    pub fn panel(&self) -> OverridePanel {
        self.panel.borrow().clone()
    }

    pub fn engine(&self) -> &TurnEngine<BoardModel, KeyboardModel> {
        &self.engine
    }

    pub fn day(&self) -> &GameDate {
        &self.day
    }

    pub fn is_over(&self) -> bool {
        self.engine.is_game_over()
    }

    /// Board, override control and keyboard as one block of text.
    pub fn paint(&self, color: bool) -> String {
        let mut out = self.engine.board().paint(color);
        out.push('\n');
        if let Some(line) = self.panel.borrow().render() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.engine.keyboard().paint(color));
        out
    }
}
