//! Shape and answer value types shared by the engine, the renderers and the wire layer.
//!
//! These mirror the JSON the game server speaks: PascalCase field names and letter
//! statuses encoded as small integers. Nothing in here has side effects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of columns on every board row; also the width of an override guess.
pub const WORD_LENGTH: usize = 7;

/// Per-letter status. The server only ever sends the first four variants;
/// `Guessing` and `Untried` are render annotations owned by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LetterStatus {
    NotInWord,
    WrongPosition,
    Correct,
    PositionNotUsed,
    Guessing,
    Untried,
}

impl LetterStatus {
    /// True for statuses the server can legitimately send back.
    pub fn is_authoritative(self) -> bool {
        !matches!(self, LetterStatus::Guessing | LetterStatus::Untried)
    }
}

impl From<LetterStatus> for u8 {
    fn from(status: LetterStatus) -> u8 {
        match status {
            LetterStatus::NotInWord => 1,
            LetterStatus::WrongPosition => 2,
            LetterStatus::Correct => 3,
            LetterStatus::PositionNotUsed => 4,
            LetterStatus::Guessing => 5,
            LetterStatus::Untried => 6,
        }
    }
}

/// Error returned when decoding an integer that is not a known status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus(pub u8);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown letter status {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl TryFrom<u8> for LetterStatus {
    type Error = UnknownStatus;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(LetterStatus::NotInWord),
            2 => Ok(LetterStatus::WrongPosition),
            3 => Ok(LetterStatus::Correct),
            4 => Ok(LetterStatus::PositionNotUsed),
            5 => Ok(LetterStatus::Guessing),
            6 => Ok(LetterStatus::Untried),
            other => Err(UnknownStatus(other)),
        }
    }
}

/// One scored letter. An empty `letter` marks a column the guess did not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LetterAnswer {
    pub letter: String,
    pub status: LetterStatus,
}

impl LetterAnswer {
    pub fn new(letter: impl Into<String>, status: LetterStatus) -> Self {
        Self {
            letter: letter.into(),
            status,
        }
    }

    /// Placeholder cell with no letter.
    pub fn blank(status: LetterStatus) -> Self {
        Self::new(String::new(), status)
    }

    pub fn is_blank(&self) -> bool {
        self.letter.is_empty()
    }
}

/// Active-column mask for a single row: `true` means the column takes a letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowShape(pub Vec<bool>);

impl RowShape {
    /// A row with every column active.
    pub fn full() -> Self {
        RowShape(vec![true; WORD_LENGTH])
    }

    /// Number of columns that take a letter this row.
    pub fn active_slots(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    pub fn columns(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Lengths of the runs of active columns, left to right. A row like
    /// `TTTFTTT` holds two three-letter words.
    pub fn word_lengths(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut run = 0;
        for active in self.columns() {
            if active {
                run += 1;
            } else if run > 0 {
                out.push(run);
                run = 0;
            }
        }
        if run > 0 {
            out.push(run);
        }
        out
    }
}

/// The day's puzzle: one mask per shaped (non-override) row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameShape(pub Vec<RowShape>);

impl GameShape {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&RowShape> {
        self.0.get(idx)
    }

    /// Shape the next guess is typed against. Past the end of the table, or with
    /// the override armed, every row is full width.
    pub fn row_for(&self, shape_index: usize, override_armed: bool) -> RowShape {
        match self.row(shape_index) {
            Some(row) if !override_armed => row.clone(),
            _ => RowShape::full(),
        }
    }
}

/// A completed, scored guess. History is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SrordleAnswer {
    pub letter_answers: Vec<LetterAnswer>,
    pub requested_full: bool,
}

impl SrordleAnswer {
    /// Every letter came back `Correct`. An empty answer is never correct.
    pub fn is_fully_correct(&self) -> bool {
        !self.letter_answers.is_empty()
            && self
                .letter_answers
                .iter()
                .all(|la| la.status == LetterStatus::Correct)
    }
}

/// Count of guesses that consumed a shaped row. Override guesses do not advance
/// the pointer into [`GameShape`].
pub fn shaped_guess_count(history: &[SrordleAnswer]) -> usize {
    history.iter().filter(|g| !g.requested_full).count()
}

/// Index of the first fully-correct guess, if any.
pub fn first_correct_index(history: &[SrordleAnswer]) -> Option<usize> {
    history.iter().position(SrordleAnswer::is_fully_correct)
}
