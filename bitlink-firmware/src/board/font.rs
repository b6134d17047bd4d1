//! 5×5 font for the LED matrix
//!
//! Covers ASCII 0x20 (space) through 0x5F (underscore). Lowercase letters
//! render with the uppercase glyphs. Each glyph is five rows, top first; bit 4
//! is the leftmost column.

use bitlink_core::traits::DisplayError;

const FIRST: u8 = b' ';
const LAST: u8 = b'_';

/// Width of one character cell when scrolling, including the gap
pub const CELL_WIDTH: usize = 6;

#[rustfmt::skip]
static GLYPHS: [[u8; 5]; (LAST - FIRST + 1) as usize] = [
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000], // ' '
    [0b00100, 0b00100, 0b00100, 0b00000, 0b00100], // !
    [0b01010, 0b01010, 0b00000, 0b00000, 0b00000], // "
    [0b01010, 0b11111, 0b01010, 0b11111, 0b01010], // #
    [0b01110, 0b11001, 0b01110, 0b10011, 0b01110], // $
    [0b11001, 0b10010, 0b00100, 0b01001, 0b10011], // %
    [0b01100, 0b10010, 0b01100, 0b10010, 0b01101], // &
    [0b00100, 0b00100, 0b00000, 0b00000, 0b00000], // '
    [0b00010, 0b00100, 0b00100, 0b00100, 0b00010], // (
    [0b01000, 0b00100, 0b00100, 0b00100, 0b01000], // )
    [0b00000, 0b01010, 0b00100, 0b01010, 0b00000], // *
    [0b00000, 0b00100, 0b01110, 0b00100, 0b00000], // +
    [0b00000, 0b00000, 0b00000, 0b00100, 0b01000], // ,
    [0b00000, 0b00000, 0b01110, 0b00000, 0b00000], // -
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00100], // .
    [0b00001, 0b00010, 0b00100, 0b01000, 0b10000], // /
    [0b01100, 0b10010, 0b10010, 0b10010, 0b01100], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b01110], // 1
    [0b11100, 0b00010, 0b01100, 0b10000, 0b11110], // 2
    [0b11110, 0b00010, 0b00100, 0b10010, 0b01100], // 3
    [0b00110, 0b01010, 0b10010, 0b11111, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b11110], // 5
    [0b00010, 0b00100, 0b01110, 0b10001, 0b01110], // 6
    [0b11111, 0b00010, 0b00100, 0b01000, 0b10000], // 7
    [0b01110, 0b10001, 0b01110, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b01110, 0b00100, 0b01000], // 9
    [0b00000, 0b00100, 0b00000, 0b00100, 0b00000], // :
    [0b00000, 0b00100, 0b00000, 0b00100, 0b01000], // ;
    [0b00010, 0b00100, 0b01000, 0b00100, 0b00010], // <
    [0b00000, 0b01110, 0b00000, 0b01110, 0b00000], // =
    [0b01000, 0b00100, 0b00010, 0b00100, 0b01000], // >
    [0b01110, 0b10001, 0b00110, 0b00000, 0b00100], // ?
    [0b01110, 0b10001, 0b10111, 0b10000, 0b01110], // @
    [0b01100, 0b10010, 0b11110, 0b10010, 0b10010], // A
    [0b11100, 0b10010, 0b11100, 0b10010, 0b11100], // B
    [0b01110, 0b10000, 0b10000, 0b10000, 0b01110], // C
    [0b11100, 0b10010, 0b10010, 0b10010, 0b11100], // D
    [0b11110, 0b10000, 0b11100, 0b10000, 0b11110], // E
    [0b11110, 0b10000, 0b11100, 0b10000, 0b10000], // F
    [0b01110, 0b10000, 0b10011, 0b10001, 0b01110], // G
    [0b10010, 0b10010, 0b11110, 0b10010, 0b10010], // H
    [0b11100, 0b01000, 0b01000, 0b01000, 0b11100], // I
    [0b11111, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10010, 0b10100, 0b11000, 0b10100, 0b10010], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b11110], // L
    [0b10001, 0b11011, 0b10101, 0b10001, 0b10001], // M
    [0b10001, 0b11001, 0b10101, 0b10011, 0b10001], // N
    [0b01100, 0b10010, 0b10010, 0b10010, 0b01100], // O
    [0b11100, 0b10010, 0b11100, 0b10000, 0b10000], // P
    [0b01100, 0b10010, 0b10010, 0b01100, 0b00110], // Q
    [0b11100, 0b10010, 0b11100, 0b10010, 0b10001], // R
    [0b01110, 0b10000, 0b01100, 0b00010, 0b11100], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10010, 0b10010, 0b10010, 0b10010, 0b01100], // U
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10101, 0b11011, 0b10001], // W
    [0b10010, 0b10010, 0b01100, 0b10010, 0b10010], // X
    [0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11110, 0b00100, 0b01000, 0b10000, 0b11110], // Z
    [0b01110, 0b01000, 0b01000, 0b01000, 0b01110], // [
    [0b10000, 0b01000, 0b00100, 0b00010, 0b00001], // \
    [0b01110, 0b00010, 0b00010, 0b00010, 0b01110], // ]
    [0b00100, 0b01010, 0b00000, 0b00000, 0b00000], // ^
    [0b00000, 0b00000, 0b00000, 0b00000, 0b11111], // _
];

/// Look up the glyph for one character
pub fn glyph(c: u8) -> Result<&'static [u8; 5], DisplayError> {
    let c = c.to_ascii_uppercase();
    if !(FIRST..=LAST).contains(&c) {
        return Err(DisplayError::UnsupportedGlyph);
    }
    Ok(&GLYPHS[(c - FIRST) as usize])
}

/// Check that every character of `text` can be drawn
pub fn check(text: &[u8]) -> Result<(), DisplayError> {
    text.iter().try_for_each(|&c| glyph(c).map(|_| ()))
}

/// One column of a text strip, as a row bitmask (bit 0 is the top row)
///
/// Each character occupies [`CELL_WIDTH`] columns, the last one blank.
/// Columns past the end of the text are blank.
pub fn strip_column(text: &[u8], column: usize) -> u8 {
    let (index, x) = (column / CELL_WIDTH, column % CELL_WIDTH);
    let Some(&c) = text.get(index) else {
        return 0;
    };
    if x >= 5 {
        return 0;
    }
    match glyph(c) {
        Ok(rows) => rows
            .iter()
            .enumerate()
            .fold(0, |mask, (y, row)| mask | (((row >> (4 - x)) & 1) << y)),
        Err(_) => 0,
    }
}
