//! Terminal capability detection and table output

use cidade::domain::color::hex_to_rgb;
use owo_colors::{OwoColorize, colors::css};

/// Below this many columns tables are printed as stacked records.
const NARROW_COLUMNS: u16 = 60;

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if the terminal is too narrow for a table
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < NARROW_COLUMNS)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as failure (red)
    fn failure(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn failure(&self) -> String {
        if supports_color() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn failure(&self) -> String {
        self.as_str().failure()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// A two-character block in a city hall's theme colour, or the hex code
/// itself when colour is off or the code does not parse.
pub fn swatch(hex: &str) -> String {
    match hex_to_rgb(hex) {
        Some(rgb) if supports_color() => "██".truecolor(rgb.r, rgb.g, rgb.b).to_string(),
        _ => hex.to_string(),
    }
}

/// Prints rows under aligned headers.
///
/// Narrow terminals get one `Header: value` line per cell instead, with a
/// blank line between records.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if is_narrow() {
        for row in rows {
            for (header, value) in headers.iter().zip(row) {
                println!("{}: {value}", header.dim());
            }
            println!();
        }
        return;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row.get(idx).map_or(0, |value| value.chars().count()))
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in rows {
        for (value, width) in row.iter().zip(&widths) {
            // `{:<width$}` pads by chars, which keeps accented names aligned.
            print!("{value:<width$}  ");
        }
        println!();
    }
}
