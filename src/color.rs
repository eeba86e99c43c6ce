//! Palette shared by the board and keyboard painters.

use crate::model::LetterStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const YELLOW: Rgb = Rgb(255, 204, 0);
pub const GREEN: Rgb = Rgb(0, 204, 136);
pub const GREY: Rgb = Rgb(75, 85, 99);
pub const GREY_BG: Rgb = Rgb(55, 65, 81);
pub const BLANK_ROW_BG: Rgb = Rgb(17, 24, 39);
pub const NOT_PRESENT_TEXT: Rgb = Rgb(8, 145, 178);
pub const NOT_PRESENT_BG: Rgb = Rgb(21, 94, 117);
pub const NOT_TRIED_BG: Rgb = Rgb(107, 114, 128);
pub const NOT_TRIED_TEXT: Rgb = WHITE;

/// Foreground/background pair for one painted cell or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellColors {
    pub text: Rgb,
    pub background: Rgb,
}

impl CellColors {
    pub const fn new(text: Rgb, background: Rgb) -> Self {
        Self { text, background }
    }
}

/// Colors for a board cell. `Untried` never appears on the board and falls back
/// to the blank-row color.
pub fn board_cell(status: LetterStatus) -> CellColors {
    match status {
        LetterStatus::NotInWord => CellColors::new(WHITE, GREY_BG),
        LetterStatus::WrongPosition => CellColors::new(BLACK, YELLOW),
        LetterStatus::Correct => CellColors::new(BLACK, GREEN),
        LetterStatus::Guessing => CellColors::new(WHITE, GREY),
        // No letter is drawn on an unused position, so the text color is moot.
        LetterStatus::PositionNotUsed => CellColors::new(WHITE, BLACK),
        LetterStatus::Untried => CellColors::new(WHITE, BLANK_ROW_BG),
    }
}

/// Colors for a keyboard key given its aggregated status.
pub fn keyboard_key(status: LetterStatus) -> CellColors {
    match status {
        LetterStatus::Correct => CellColors::new(BLACK, GREEN),
        LetterStatus::WrongPosition => CellColors::new(BLACK, YELLOW),
        LetterStatus::NotInWord => CellColors::new(NOT_PRESENT_TEXT, NOT_PRESENT_BG),
        _ => CellColors::new(NOT_TRIED_TEXT, NOT_TRIED_BG),
    }
}

/// Wrap `text` in 24-bit ANSI color escapes, or return it unchanged when color is off.
pub fn paint(text: &str, colors: CellColors, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let Rgb(fr, fg, fb) = colors.text;
    let Rgb(br, bg, bb) = colors.background;
    format!("\x1b[38;2;{fr};{fg};{fb}m\x1b[48;2;{br};{bg};{bb}m{text}\x1b[0m")
}
