//! Events the turn engine publishes to its subscribers.
//!
//! Subscribers are called synchronously, in registration order, from inside the
//! engine operation that produced the event. Persistence and the override control
//! panel hang off these; the board and keyboard are driven through their own ports.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::SrordleAnswer;

/// How long a transient error stays on screen.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_millis(1250);

/// Terminal result of a game. Saved with the day's progress as `"Won"` / `"Lost"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// A user-facing message: a transient error, or one of the two end-of-game cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Won,
    Lost { target_word: Option<String> },
}

impl Notice {
    /// The game result an end-of-game card announces.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            Notice::Error(_) => None,
            Notice::Won => Some(GameOutcome::Won),
            Notice::Lost { .. } => Some(GameOutcome::Lost),
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Notice::Error(_) => "Error".to_string(),
            Notice::Won => "You've won!".to_string(),
            Notice::Lost {
                target_word: Some(word),
            } => format!("You've lost, the word was {}", word.to_uppercase()),
            Notice::Lost { target_word: None } => "You've lost.".to_string(),
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notice::Error(msg) => msg.clone(),
            Notice::Won => "Congratulations!".to_string(),
            Notice::Lost {
                target_word: Some(_),
            } => "Womp womp. If this isn't your last legit run, refresh the page to play again."
                .to_string(),
            Notice::Lost { target_word: None } => "Womp womp.".to_string(),
        }
    }

    /// Errors dismiss themselves; end-of-game cards stay up.
    pub fn dismiss_after(&self) -> Option<Duration> {
        match self {
            Notice::Error(_) => Some(ERROR_DISMISS_AFTER),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent<'a> {
    /// A scored guess was appended. `next_row_length` is the capacity of the
    /// following row with the override disarmed.
    GuessSubmitted {
        history: &'a [SrordleAnswer],
        next_row_length: usize,
    },
    /// The remaining-override counter was (re)announced.
    AttemptsChanged {
        remaining: u32,
        override_armed: bool,
    },
    Notice(&'a Notice),
}

/// Subscriber to engine events. Closures taking `&EngineEvent` implement this.
pub trait EngineObserver {
    fn on_event(&mut self, event: &EngineEvent<'_>);
}

impl<F> EngineObserver for F
where
    F: FnMut(&EngineEvent<'_>),
{
    fn on_event(&mut self, event: &EngineEvent<'_>) {
        self(event)
    }
}

/// Registration-ordered list of subscribers.
#[derive(Default)]
pub struct Subscribers {
    observers: Vec<Box<dyn EngineObserver>>,
}

impl Subscribers {
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: EngineObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Closure form of [`Subscribers::subscribe`].
    pub fn subscribe_fn<F>(&mut self, f: F)
    where
        F: FnMut(&EngineEvent<'_>) + 'static,
    {
        self.subscribe(f);
    }

    pub fn publish(&mut self, event: &EngineEvent<'_>) {
        for observer in self.observers.iter_mut() {
            observer.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
