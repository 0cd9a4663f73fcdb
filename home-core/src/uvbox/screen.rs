// Textpuffer für das 84x48 Display (PCD8544, 6x8 Pixel Zeichen)

use core::fmt::{self, Write};

pub const SCREEN_ROWS: usize = 6;
pub const SCREEN_COLS: usize = 14;

/// 6 Zeilen à 14 ASCII-Zeichen
///
/// Nicht-ASCII-Zeichen werden als `?` abgelegt, überlange Zeilen
/// abgeschnitten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextScreen {
    cells: [[u8; SCREEN_COLS]; SCREEN_ROWS],
}

impl Default for TextScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScreen {
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; SCREEN_COLS]; SCREEN_ROWS],
        }
    }

    pub fn clear(&mut self) {
        self.cells = [[b' '; SCREEN_COLS]; SCREEN_ROWS];
    }

    /// Schreibt Text ab Spalte 0, der Rest der Zeile wird geleert
    pub fn print(&mut self, row: usize, text: &str) {
        self.print_fmt(row, format_args!("{}", text));
    }

    pub fn print_fmt(&mut self, row: usize, args: fmt::Arguments<'_>) {
        let Some(cells) = self.cells.get_mut(row) else {
            return;
        };
        *cells = [b' '; SCREEN_COLS];
        let mut writer = RowWriter { cells, col: 0 };
        let _ = writer.write_fmt(args);
    }

    /// Zeile als Text (immer 14 Zeichen)
    pub fn row(&self, row: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|cells| core::str::from_utf8(cells).ok())
            .unwrap_or("")
    }

    pub fn rows(&self) -> impl Iterator<Item = &str> {
        (0..SCREEN_ROWS).map(|row| self.row(row))
    }
}

struct RowWriter<'a> {
    cells: &'a mut [u8; SCREEN_COLS],
    col: usize,
}

impl Write for RowWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.col >= SCREEN_COLS {
                break;
            }
            self.cells[self.col] = if c.is_ascii() { c as u8 } else { b'?' };
            self.col += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_pads_and_truncates() {
        let mut screen = TextScreen::new();
        screen.print(0, "Hello");
        screen.print(1, "0123456789ABCDEF");
        assert_eq!(screen.row(0), "Hello         ");
        assert_eq!(screen.row(1), "0123456789ABCD");
        assert_eq!(screen.row(9), "");
    }

    #[test]
    fn test_print_fmt_replaces_row() {
        let mut screen = TextScreen::new();
        screen.print(2, "something long");
        screen.print_fmt(2, format_args!("   {:02}:{:02}", 1, 5));
        assert_eq!(screen.row(2), "   01:05      ");
    }
}
