//! Text measurement and wrapping.
//!
//! Layout only needs two things from a font backend: how wide a string is, and
//! how a string splits into lines of a given width. The line count drives the
//! vertical cursor, so the split must agree with what the PDF actually draws.

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    /// Font size in points.
    pub size: f64,
}

impl TextStyle {
    pub const fn regular(size: f64) -> Self {
        Self {
            weight: FontWeight::Regular,
            size,
        }
    }

    pub const fn bold(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            size,
        }
    }
}

pub trait TextMeasure {
    /// Rendered width of `text` in millimetres.
    fn width(&self, text: &str, style: TextStyle) -> f64;

    /// Split `text` into lines no wider than `max_width`. Newlines always
    /// break; a word wider than the line is broken between characters.
    /// Never returns an empty vector.
    fn split_to_width(&self, text: &str, max_width: f64, style: TextStyle) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let paragraph = paragraph.trim_end_matches('\r');
            let mut current = String::new();

            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.width(&candidate, style) <= max_width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.width(word, style) <= max_width {
                    current = word.to_string();
                    continue;
                }

                for ch in word.chars() {
                    current.push(ch);
                    if self.width(&current, style) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }

            lines.push(current);
        }

        lines
    }
}

/// Standard Type1 Helvetica metrics (AFM widths, 1/1000 em).
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

// Widths for ' ' (0x20) through '~' (0x7E).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' - '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' - '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' - 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' - 'Z'
    278, 278, 278, 469, 556, 333, // '[' - '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' - 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' - 'z'
    334, 260, 334, 584, // '{' - '~'
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' - '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' - '9'
    333, 333, 584, 584, 584, 611, 975, // ':' - '@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A' - 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' - 'Z'
    333, 278, 333, 584, 556, 333, // '[' - '`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a' - 'm'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n' - 'z'
    389, 280, 389, 584, // '{' - '~'
];

impl Helvetica {
    fn glyph_width(ch: char, weight: FontWeight) -> u16 {
        let table = match weight {
            FontWeight::Regular => &HELVETICA_WIDTHS,
            FontWeight::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match ch {
            ' '..='~' => table[ch as usize - 0x20],
            '•' => 350,
            '—' => 1000,
            '–' => 556,
            '°' => 400,
            'µ' => match weight {
                FontWeight::Regular => 556,
                FontWeight::Bold => 611,
            },
            _ => 556,
        }
    }
}

impl TextMeasure for Helvetica {
    fn width(&self, text: &str, style: TextStyle) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(Self::glyph_width(ch, style.weight)))
            .sum();
        f64::from(units) / 1000.0 * style.size / PT_PER_MM
    }
}
