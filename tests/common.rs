//! Test utilities & fixtures.
//!
//! [`ScriptedServer`] stands in for the game server: it scores guesses against a
//! fixed target word, and canned replies or failures can be queued ahead of that.
//! [`RecordingBoard`] logs every port call the engine makes.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{FixedOffset, TimeZone};
use srordle::client::{
    ClientError, GameRequest, GameResponse, GameServer, GameSpec, GuessRequest, GuessResponse,
};
use srordle::engine::{BoardView, KeyboardView};
use srordle::model::{
    GameShape, LetterAnswer, LetterStatus, RowShape, SrordleAnswer, WORD_LENGTH,
};
use srordle::storage::GameDate;

/// Parse a mask like `"TTTTTFF"`.
pub fn row(mask: &str) -> RowShape {
    RowShape(mask.chars().map(|c| c == 'T').collect())
}

pub fn shape(masks: &[&str]) -> GameShape {
    GameShape(masks.iter().map(|m| row(m)).collect())
}

/// 2026-03-07 in UTC-5.
pub fn test_day() -> GameDate {
    let tz = FixedOffset::west_opt(5 * 3600).expect("offset");
    GameDate::from_datetime(&tz.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap())
}

pub fn answers(word: &str, status: LetterStatus) -> Vec<LetterAnswer> {
    word.chars()
        .map(|c| LetterAnswer::new(c.to_string(), status))
        .collect()
}

pub fn scored(word: &str, status: LetterStatus, requested_full: bool) -> SrordleAnswer {
    SrordleAnswer {
        letter_answers: answers(word, status),
        requested_full,
    }
}

pub enum Reply {
    Response(GuessResponse),
    Timeout,
}

struct Script {
    game: GameResponse,
    target: String,
    queued: VecDeque<Reply>,
    requests: Vec<GuessRequest>,
    game_requests: Vec<GameRequest>,
}

#[derive(Clone)]
pub struct ScriptedServer {
    script: Arc<Mutex<Script>>,
}

impl ScriptedServer {
    pub fn new(shape: GameShape, full_attempts: u32, target: &str) -> Self {
        Self::with_game_response(
            GameResponse {
                game: Some(GameSpec {
                    shape,
                    full_attempts,
                }),
                error: None,
            },
            target,
        )
    }

    pub fn with_game_response(game: GameResponse, target: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                game,
                target: target.to_string(),
                queued: VecDeque::new(),
                requests: Vec::new(),
                game_requests: Vec::new(),
            })),
        }
    }

    pub fn queue(&self, reply: Reply) {
        self.script.lock().unwrap().queued.push_back(reply);
    }

    pub fn queue_error(&self, msg: &str) {
        self.queue(Reply::Response(GuessResponse {
            error: Some(msg.to_string()),
            ..Default::default()
        }));
    }

    pub fn requests(&self) -> Vec<GuessRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn game_requests(&self) -> Vec<GameRequest> {
        self.script.lock().unwrap().game_requests.clone()
    }

    /// Score like the real server: one entry per column, guess letters laid into
    /// the row's active columns, masked columns blank.
    fn score(script: &Script, request: &GuessRequest) -> GuessResponse {
        let shape = match &script.game.game {
            Some(game) => game.shape.row_for(request.guess_index, request.use_full),
            None => RowShape::full(),
        };
        let target: Vec<char> = script.target.chars().collect();
        let mut letters = request.guess.chars();
        let mut answer = Vec::with_capacity(WORD_LENGTH);
        for (col, active) in shape.columns().enumerate() {
            if !active {
                answer.push(LetterAnswer::blank(LetterStatus::PositionNotUsed));
                continue;
            }
            let Some(ch) = letters.next() else {
                answer.push(LetterAnswer::blank(LetterStatus::PositionNotUsed));
                continue;
            };
            let status = if target.get(col) == Some(&ch) {
                LetterStatus::Correct
            } else if target.contains(&ch) {
                LetterStatus::WrongPosition
            } else {
                LetterStatus::NotInWord
            };
            answer.push(LetterAnswer::new(ch.to_string(), status));
        }
        GuessResponse {
            answer: Some(answer),
            won: Some(request.guess == script.target),
            error: None,
            target_word: None,
        }
    }
}

impl GameServer for ScriptedServer {
    async fn fetch_game(&self, request: GameRequest) -> Result<GameResponse, ClientError> {
        let mut script = self.script.lock().unwrap();
        script.game_requests.push(request);
        Ok(script.game.clone())
    }

    async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ClientError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request.clone());
        match script.queued.pop_front() {
            Some(Reply::Response(resp)) => Ok(resp),
            Some(Reply::Timeout) => Err(ClientError::Timeout(5)),
            None => Ok(Self::score(&script, &request)),
        }
    }
}

/// Board view that records each call as a short string.
#[derive(Debug, Default)]
pub struct RecordingBoard {
    pub calls: Vec<String>,
}

impl BoardView for RecordingBoard {
    fn set_game_shape(&mut self, shape: &GameShape) {
        self.calls.push(format!("shape {}", shape.len()));
    }

    fn set_past_guesses(&mut self, history: &[SrordleAnswer]) {
        self.calls.push(format!("past {}", history.len()));
    }

    fn add_guess(&mut self, guess: &SrordleAnswer) {
        self.calls
            .push(format!("add {} full={}", guess.letter_answers.len(), guess.requested_full));
    }

    fn update_current_guess(&mut self, buffer: &[char]) {
        self.calls
            .push(format!("buffer {:?}", buffer.iter().collect::<String>()));
    }

    fn set_requested_full(&mut self, armed: bool) {
        self.calls.push(format!("requested_full {}", armed));
    }
}

#[derive(Debug, Default)]
pub struct RecordingKeyboard {
    pub guesses: usize,
}

impl KeyboardView for RecordingKeyboard {
    fn set_past_guesses(&mut self, history: &[SrordleAnswer]) {
        self.guesses = history.len();
    }

    fn add_guess(&mut self, _guess: &SrordleAnswer) {
        self.guesses += 1;
    }
}
