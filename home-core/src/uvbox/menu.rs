// Menü mit Cursor, eine Zeile pro Eintrag

use super::keys::Key;
use super::screen::{SCREEN_ROWS, TextScreen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// Nichts passiert (z.B. Cursor am Rand)
    None,
    Moved,
    /// Eintrag mit Index gewählt
    Open(usize),
    /// Menü verlassen
    Exit,
}

#[derive(Debug, Clone)]
pub struct Menu {
    entries: &'static [&'static str],
    cursor: usize,
    cancellable: bool,
}

impl Menu {
    /// `cancellable`: Links/Rechts verlässt das Menü
    pub const fn new(entries: &'static [&'static str], cancellable: bool) -> Self {
        Self {
            entries,
            cursor: 0,
            cancellable,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hoch/Runter ohne Umlauf, Enter öffnet den Eintrag
    pub fn handle(&mut self, key: Key) -> MenuEvent {
        match key {
            Key::Up if self.cursor > 0 => {
                self.cursor -= 1;
                MenuEvent::Moved
            }
            Key::Down if self.cursor + 1 < self.entries.len() => {
                self.cursor += 1;
                MenuEvent::Moved
            }
            Key::Enter if !self.entries.is_empty() => MenuEvent::Open(self.cursor),
            Key::Left | Key::Right if self.cancellable => MenuEvent::Exit,
            _ => MenuEvent::None,
        }
    }

    /// Auswahl als `>Name<`, sonst ` Name`
    ///
    /// Bei mehr Einträgen als Zeilen scrollt das Fenster mit dem Cursor.
    pub fn render(&self, screen: &mut TextScreen) {
        screen.clear();
        let first = self.cursor.saturating_sub(SCREEN_ROWS - 1);
        for (row, (index, name)) in self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(SCREEN_ROWS)
            .enumerate()
        {
            if index == self.cursor {
                screen.print_fmt(row, format_args!(">{}<", name));
            } else {
                screen.print_fmt(row, format_args!(" {}", name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRIES: &[&str] = &["Timer", "Back light"];

    #[test]
    fn test_cursor_is_bounded() {
        let mut menu = Menu::new(ENTRIES, true);
        assert_eq!(menu.handle(Key::Up), MenuEvent::None);
        assert_eq!(menu.handle(Key::Down), MenuEvent::Moved);
        assert_eq!(menu.handle(Key::Down), MenuEvent::None);
        assert_eq!(menu.cursor(), 1);
        assert_eq!(menu.handle(Key::Enter), MenuEvent::Open(1));
    }

    #[test]
    fn test_root_menu_not_cancellable() {
        let mut menu = Menu::new(ENTRIES, false);
        assert_eq!(menu.handle(Key::Left), MenuEvent::None);
        let mut sub = Menu::new(ENTRIES, true);
        assert_eq!(sub.handle(Key::Right), MenuEvent::Exit);
    }

    #[test]
    fn test_render_marks_cursor() {
        let mut menu = Menu::new(ENTRIES, true);
        menu.handle(Key::Down);
        let mut screen = TextScreen::new();
        menu.render(&mut screen);
        assert_eq!(screen.row(0).trim_end(), " Timer");
        assert_eq!(screen.row(1).trim_end(), ">Back light<");
    }
}
