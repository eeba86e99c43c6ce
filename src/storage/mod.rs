//! # Local progress store
//!
//! Saved guesses and the remaining override counter for one calendar day, keyed
//! by the player's local date at the moment the [`GameDate`] was captured.
//!
//! ## Keys
//!
//! ```text
//! pastGuesses:2026-10-18            ← JSON list of scored guesses
//! remainingFullAttempts:2026-10-18  ← JSON integer
//! gameOutcome:2026-10-18            ← "Won" or "Lost", once the game has ended
//! ```
//!
//! Month and day are not zero padded.
//!
//! ## Values
//!
//! Each value is a versioned envelope, `{"schema":1,"data":...}`. Bare values (a raw
//! list or integer) are also accepted on read. Anything that fails to decode, carries
//! a different schema, or describes an impossible guess reads as "no saved data":
//! a bad save must never take down a session.
//!
//! ```rust,no_run
//! use srordle::storage::{GameDate, MemoryStore, ProgressStore};
//!
//! let store = ProgressStore::new(MemoryStore::new());
//! let today = GameDate::today();
//! let guesses = store.load_past_guesses(&today);
//! let remaining = store.load_remaining_attempts(&today, 2);
//! assert!(guesses.is_empty());
//! assert_eq!(remaining, 2);
//! ```

pub mod backend;

use chrono::{DateTime, Datelike, Local, Offset, TimeZone};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use backend::{AnyStore, FileStore, KeyValueStore, MemoryStore, SledStore, StoreError};

use crate::engine::events::{EngineEvent, EngineObserver, GameOutcome};
use crate::model::{SrordleAnswer, WORD_LENGTH};

/// Current envelope schema.
pub const SCHEMA_VERSION: u32 = 1;

pub const PAST_GUESSES_KIND: &str = "pastGuesses";
pub const REMAINING_ATTEMPTS_KIND: &str = "remainingFullAttempts";
pub const OUTCOME_KIND: &str = "gameOutcome";

/// A local calendar day plus the UTC offset in effect when it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDate {
    year: i32,
    month: u32,
    day: u32,
    tz_offset: i32,
}

impl GameDate {
    pub fn today() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            tz_offset: dt.offset().fix().local_minus_utc(),
        }
    }

    /// Storage key for `kind` on this day, e.g. `pastGuesses:2026-3-7`.
    pub fn key(&self, kind: &str) -> String {
        format!("{}:{}", kind, self)
    }

    /// Seconds east of UTC.
    pub fn tz_offset(&self) -> i32 {
        self.tz_offset
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: u32,
    data: &'a T,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored<T> {
    Versioned { schema: u32, data: T },
    Bare(T),
}

/// Day-scoped progress on top of any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Saved guesses for `day`; empty when absent or unreadable.
    pub fn load_past_guesses(&self, day: &GameDate) -> Vec<SrordleAnswer> {
        let key = day.key(PAST_GUESSES_KIND);
        let guesses: Vec<SrordleAnswer> = self.load_value(&key).unwrap_or_default();
        if let Some(reason) = invalid_history(&guesses) {
            warn!("discarding saved guesses under {}: {}", key, reason);
            return Vec::new();
        }
        guesses
    }

    pub fn save_past_guesses(
        &self,
        day: &GameDate,
        guesses: &[SrordleAnswer],
    ) -> Result<(), StoreError> {
        self.save_value(&day.key(PAST_GUESSES_KIND), &guesses)
    }

    /// Saved counter for `day`, if one was written and is readable.
    pub fn peek_remaining_attempts(&self, day: &GameDate) -> Option<u32> {
        self.load_value(&day.key(REMAINING_ATTEMPTS_KIND))
    }

    pub fn load_remaining_attempts(&self, day: &GameDate, default: u32) -> u32 {
        self.peek_remaining_attempts(day).unwrap_or(default)
    }

    pub fn save_remaining_attempts(&self, day: &GameDate, remaining: u32) -> Result<(), StoreError> {
        self.save_value(&day.key(REMAINING_ATTEMPTS_KIND), &remaining)
    }

    /// How the day's game ended, if it has.
    pub fn load_outcome(&self, day: &GameDate) -> Option<GameOutcome> {
        self.load_value(&day.key(OUTCOME_KIND))
    }

    pub fn save_outcome(&self, day: &GameDate, outcome: GameOutcome) -> Result<(), StoreError> {
        self.save_value(&day.key(OUTCOME_KIND), &outcome)
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("progress read {} failed: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<Stored<T>>(&raw) {
            Ok(Stored::Versioned { schema, data }) if schema == SCHEMA_VERSION => Some(data),
            Ok(Stored::Versioned { schema, .. }) => {
                warn!(
                    "progress {} has schema {}, expected {}; ignoring",
                    key, schema, SCHEMA_VERSION
                );
                None
            }
            Ok(Stored::Bare(data)) => {
                debug!("progress {} is an unversioned value", key);
                Some(data)
            }
            Err(e) => {
                warn!("progress {} unreadable, ignoring: {}", key, e);
                None
            }
        }
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let envelope = EnvelopeRef {
            schema: SCHEMA_VERSION,
            data: value,
        };
        let json = serde_json::to_string(&envelope)?;
        self.store.set(key, &json)
    }
}

/// Why a decoded history cannot be trusted, if it cannot.
fn invalid_history(guesses: &[SrordleAnswer]) -> Option<String> {
    for (i, guess) in guesses.iter().enumerate() {
        if guess.letter_answers.len() > WORD_LENGTH {
            return Some(format!(
                "guess {} has {} letters",
                i,
                guess.letter_answers.len()
            ));
        }
        if let Some(la) = guess
            .letter_answers
            .iter()
            .find(|la| !la.status.is_authoritative())
        {
            return Some(format!("guess {} carries client-only status {:?}", i, la.status));
        }
    }
    None
}

/// Engine subscriber that writes history, the override counter and the final
/// outcome through to a [`ProgressStore`] as they change.
pub struct ProgressRecorder<S> {
    progress: ProgressStore<S>,
    day: GameDate,
}

impl<S: KeyValueStore> ProgressRecorder<S> {
    pub fn new(progress: ProgressStore<S>, day: GameDate) -> Self {
        Self { progress, day }
    }
}

impl<S: KeyValueStore> EngineObserver for ProgressRecorder<S> {
    fn on_event(&mut self, event: &EngineEvent<'_>) {
        let result = match event {
            EngineEvent::GuessSubmitted { history, .. } => {
                self.progress.save_past_guesses(&self.day, history)
            }
            EngineEvent::AttemptsChanged { remaining, .. } => {
                self.progress.save_remaining_attempts(&self.day, *remaining)
            }
            EngineEvent::Notice(notice) => match notice.outcome() {
                Some(outcome) => self.progress.save_outcome(&self.day, outcome),
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            warn!("failed to save progress for {}: {}", self.day, e);
        }
    }
}
