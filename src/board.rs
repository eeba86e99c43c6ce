//! Board renderer: an 8 x 7 grid of letter cells.
//!
//! The board keeps its own copy of what it has been told through [`BoardView`]
//! and derives each row's display mode on demand:
//!
//! 1. a past guess, unless it comes after the winning guess
//! 2. the row being typed, while nobody has won
//! 3. a blank bar
//!
//! Past guesses are laid out by column: the server scores all seven columns and
//! sends blanks for the masked ones. Columns it did not send render as unused.

use crate::color::{self, CellColors};
use crate::engine::BoardView;
use crate::model::{
    first_correct_index, shaped_guess_count, GameShape, LetterAnswer, LetterStatus,
    SrordleAnswer, WORD_LENGTH,
};

/// Rows on the board: enough for every shaped row plus the override guesses.
pub const BOARD_ROWS: usize = 8;

/// Display mode of one board row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRender {
    Past(Vec<LetterAnswer>),
    Active(Vec<LetterAnswer>),
    Blank,
}

impl RowRender {
    /// The row's seven cells. A blank bar has none.
    pub fn cells(&self) -> &[LetterAnswer] {
        match self {
            RowRender::Past(cells) | RowRender::Active(cells) => cells,
            RowRender::Blank => &[],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardModel {
    shape: GameShape,
    past_guesses: Vec<SrordleAnswer>,
    current_guess: Vec<char>,
    requested_full: bool,
}

impl BoardModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<RowRender> {
        (0..BOARD_ROWS).map(|i| self.row(i)).collect()
    }

    pub fn row(&self, index: usize) -> RowRender {
        let winner = first_correct_index(&self.past_guesses);

        if let Some(guess) = self.past_guesses.get(index) {
            if winner.map_or(true, |w| index <= w) {
                return RowRender::Past(past_cells(guess));
            }
        }

        if index == self.past_guesses.len() && winner.is_none() {
            return RowRender::Active(self.active_cells());
        }

        RowRender::Blank
    }

    fn active_cells(&self) -> Vec<LetterAnswer> {
        let row = self.shape.row_for(
            shaped_guess_count(&self.past_guesses),
            self.requested_full,
        );
        let mut typed = self.current_guess.iter();
        row.columns()
            .map(|active| {
                if !active {
                    return LetterAnswer::blank(LetterStatus::PositionNotUsed);
                }
                match typed.next() {
                    Some(ch) => LetterAnswer::new(ch.to_string(), LetterStatus::Guessing),
                    None => LetterAnswer::blank(LetterStatus::Guessing),
                }
            })
            .collect()
    }

    pub fn is_requested_full(&self) -> bool {
        self.requested_full
    }

    /// Paint the board as text, one line per row.
    pub fn paint(&self, color_enabled: bool) -> String {
        let mut out = String::new();
        for row in self.rows() {
            match &row {
                RowRender::Blank => {
                    let bar = CellColors::new(color::WHITE, color::BLANK_ROW_BG);
                    for _ in 0..WORD_LENGTH {
                        out.push_str(&color::paint(" . ", bar, color_enabled));
                    }
                }
                _ => {
                    for cell in row.cells() {
                        out.push_str(&paint_cell(cell, color_enabled));
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

fn past_cells(guess: &SrordleAnswer) -> Vec<LetterAnswer> {
    (0..WORD_LENGTH)
        .map(|col| {
            guess
                .letter_answers
                .get(col)
                .cloned()
                .unwrap_or_else(|| LetterAnswer::blank(LetterStatus::PositionNotUsed))
        })
        .collect()
}

fn paint_cell(cell: &LetterAnswer, color_enabled: bool) -> String {
    let text = if cell.is_blank() {
        if color_enabled {
            "   ".to_string()
        } else {
            // Without color the status has to show in the glyph.
            match cell.status {
                LetterStatus::PositionNotUsed => "   ".to_string(),
                _ => " _ ".to_string(),
            }
        }
    } else if color_enabled {
        format!(" {} ", cell.letter.to_uppercase())
    } else {
        let upper = cell.letter.to_uppercase();
        match cell.status {
            LetterStatus::Correct => format!("[{}]", upper),
            LetterStatus::WrongPosition => format!("({})", upper),
            _ => format!(" {} ", upper),
        }
    };
    color::paint(&text, color::board_cell(cell.status), color_enabled)
}

impl BoardView for BoardModel {
    fn set_game_shape(&mut self, shape: &GameShape) {
        self.shape = shape.clone();
    }

    fn set_past_guesses(&mut self, history: &[SrordleAnswer]) {
        self.past_guesses = history.to_vec();
    }

    fn add_guess(&mut self, guess: &SrordleAnswer) {
        self.requested_full = false;
        self.past_guesses.push(guess.clone());
    }

    fn update_current_guess(&mut self, buffer: &[char]) {
        self.current_guess = buffer.to_vec();
    }

    fn set_requested_full(&mut self, armed: bool) {
        self.requested_full = armed;
    }
}
