//! On-screen keyboard: best-known status per letter, plus key intents.
//!
//! Aggregation is per letter, not per position. A letter seen as `Correct`
//! anywhere shows `Correct` even if a repeat of it was scored `NotInWord`.

use std::collections::BTreeMap;

use crate::color;
use crate::engine::KeyboardView;
use crate::model::{LetterStatus, SrordleAnswer};

/// Physical layout, top row first.
pub const KEYS_BY_ROW: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// What a key press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Letter(char),
    Delete,
    Submit,
}

impl KeyIntent {
    /// Map a key name (`"Enter"`, `"Backspace"`, `"a"`) to an intent. Letters are
    /// case-insensitive and always forwarded lowercase.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Enter" => return Some(KeyIntent::Submit),
            "Backspace" => return Some(KeyIntent::Delete),
            _ => {}
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.is_ascii_alphabetic() => {
                Some(KeyIntent::Letter(ch.to_ascii_lowercase()))
            }
            _ => None,
        }
    }
}

fn rank(status: LetterStatus) -> u8 {
    match status {
        LetterStatus::Correct => 3,
        LetterStatus::WrongPosition => 2,
        LetterStatus::NotInWord => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardModel {
    past_guesses: Vec<SrordleAnswer>,
}

impl KeyboardModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregated status for every letter that has been scored at least once.
    pub fn knowledge(&self) -> BTreeMap<char, LetterStatus> {
        let mut known: BTreeMap<char, LetterStatus> = BTreeMap::new();
        let scored = self
            .past_guesses
            .iter()
            .flat_map(|g| g.letter_answers.iter())
            .filter(|la| !la.is_blank() && la.status != LetterStatus::PositionNotUsed);
        for la in scored {
            for ch in la.letter.chars().map(|c| c.to_ascii_lowercase()) {
                let entry = known.entry(ch).or_insert(LetterStatus::Untried);
                if rank(la.status) > rank(*entry) {
                    *entry = la.status;
                }
            }
        }
        known
    }

    pub fn status_of(&self, key: char) -> LetterStatus {
        self.knowledge()
            .get(&key.to_ascii_lowercase())
            .copied()
            .unwrap_or(LetterStatus::Untried)
    }

    /// Paint the three key rows; the last row is flanked by ENTER and DEL.
    pub fn paint(&self, color_enabled: bool) -> String {
        let known = self.knowledge();
        let mut out = String::new();
        for (i, row) in KEYS_BY_ROW.iter().enumerate() {
            out.push_str(&" ".repeat(i * 2));
            if i == KEYS_BY_ROW.len() - 1 {
                out.push_str("ENTER ");
            }
            for key in row.chars() {
                let status = known.get(&key).copied().unwrap_or(LetterStatus::Untried);
                let label = if color_enabled {
                    format!(" {} ", key.to_ascii_uppercase())
                } else {
                    match status {
                        LetterStatus::Correct => format!("[{}]", key.to_ascii_uppercase()),
                        LetterStatus::WrongPosition => format!("({})", key.to_ascii_uppercase()),
                        LetterStatus::NotInWord => " · ".to_string(),
                        _ => format!(" {} ", key.to_ascii_uppercase()),
                    }
                };
                out.push_str(&color::paint(&label, color::keyboard_key(status), color_enabled));
            }
            if i == KEYS_BY_ROW.len() - 1 {
                out.push_str(" DEL");
            }
            out.push('\n');
        }
        out
    }
}

impl KeyboardView for KeyboardModel {
    fn set_past_guesses(&mut self, history: &[SrordleAnswer]) {
        self.past_guesses = history.to_vec();
    }

    fn add_guess(&mut self, guess: &SrordleAnswer) {
        self.past_guesses.push(guess.clone());
    }
}
