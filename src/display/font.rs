//! 5x7 bitmap font for scrolling messages across the matrix.
//!
//! Glyphs are stored column by column; bit 0 is the top row. Lowercase letters
//! are drawn with the uppercase glyphs and anything unknown renders as `?`.

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
/// Blank columns between two glyphs
pub const GLYPH_SPACING: usize = 1;

type Glyph = [u8; GLYPH_WIDTH];

const UNKNOWN: Glyph = [0x02, 0x01, 0x51, 0x09, 0x06];

const DIGITS: [Glyph; 10] = [
    [0x3E, 0x51, 0x49, 0x45, 0x3E],
    [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46],
    [0x21, 0x41, 0x45, 0x4B, 0x31],
    [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39],
    [0x3C, 0x4A, 0x49, 0x49, 0x30],
    [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36],
    [0x06, 0x49, 0x49, 0x29, 0x1E],
];

const LETTERS: [Glyph; 26] = [
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36],
    [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x22, 0x1C],
    [0x7F, 0x49, 0x49, 0x49, 0x41],
    [0x7F, 0x09, 0x09, 0x09, 0x01],
    [0x3E, 0x41, 0x49, 0x49, 0x7A],
    [0x7F, 0x08, 0x08, 0x08, 0x7F],
    [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01],
    [0x7F, 0x08, 0x14, 0x22, 0x41],
    [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F],
    [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06],
    [0x3E, 0x41, 0x51, 0x21, 0x5E],
    [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31],
    [0x01, 0x01, 0x7F, 0x01, 0x01],
    [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F],
    [0x3F, 0x40, 0x38, 0x40, 0x3F],
    [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x07, 0x08, 0x70, 0x08, 0x07],
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
];

/// Column bitmaps for one character
pub fn glyph(c: char) -> Glyph {
    match c {
        ' ' => [0; GLYPH_WIDTH],
        '!' => [0x00, 0x00, 0x5F, 0x00, 0x00],
        '\'' => [0x00, 0x00, 0x07, 0x00, 0x00],
        ',' => [0x00, 0x50, 0x30, 0x00, 0x00],
        '-' => [0x08; GLYPH_WIDTH],
        '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
        '0'..='9' => DIGITS[c as usize - '0' as usize],
        'A'..='Z' => LETTERS[c as usize - 'A' as usize],
        'a'..='z' => LETTERS[c as usize - 'a' as usize],
        _ => UNKNOWN,
    }
}

/// Render text into column bitmaps, one spacing column after every glyph
pub fn text_columns(text: &str) -> Vec<u8> {
    let mut columns = Vec::with_capacity(text.len() * (GLYPH_WIDTH + GLYPH_SPACING));
    for c in text.chars() {
        columns.extend_from_slice(&glyph(c));
        columns.extend(std::iter::repeat(0).take(GLYPH_SPACING));
    }
    columns
}

pub fn text_width(text: &str) -> usize {
    text.chars().count() * (GLYPH_WIDTH + GLYPH_SPACING)
}
