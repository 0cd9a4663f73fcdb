// Tastatur der UV-Box: fünf Taster, Auswertung der Druck-Flanke

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl Key {
    /// Reihenfolge der Eingänge beim Abtasten
    pub const ALL: [Key; 5] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Enter];

    pub const fn is_arrow(self) -> bool {
        !matches!(self, Key::Enter)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Key {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Key::Up => defmt::write!(fmt, "Up"),
            Key::Down => defmt::write!(fmt, "Down"),
            Key::Left => defmt::write!(fmt, "Left"),
            Key::Right => defmt::write!(fmt, "Right"),
            Key::Enter => defmt::write!(fmt, "Enter"),
        }
    }
}

/// Liefert eine Taste einmal pro Druck
///
/// Gehaltene Tasten wiederholen nicht. Bei gleichzeitigem Druck gewinnt
/// die erste Taste in `Key::ALL`, die übrigen werden verworfen.
#[derive(Debug, Default)]
pub struct KeyScanner {
    pressed: [bool; 5],
}

impl KeyScanner {
    pub const fn new() -> Self {
        Self { pressed: [false; 5] }
    }

    /// `levels[i] == true` heißt Taste `Key::ALL[i]` gedrückt
    pub fn scan(&mut self, levels: [bool; 5]) -> Option<Key> {
        let mut result = None;
        for (index, (&level, was)) in levels.iter().zip(self.pressed.iter_mut()).enumerate() {
            if level && !*was && result.is_none() {
                result = Some(Key::ALL[index]);
            }
            *was = level;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_reported_once() {
        let mut scanner = KeyScanner::new();
        let enter = [false, false, false, false, true];
        assert_eq!(scanner.scan(enter), Some(Key::Enter));
        assert_eq!(scanner.scan(enter), None);
        assert_eq!(scanner.scan([false; 5]), None);
        assert_eq!(scanner.scan(enter), Some(Key::Enter));
    }

    #[test]
    fn test_simultaneous_press_first_wins() {
        let mut scanner = KeyScanner::new();
        assert_eq!(scanner.scan([false, true, true, false, false]), Some(Key::Down));
        // Left ist noch gedrückt und wird nicht nachgeliefert
        assert_eq!(scanner.scan([false, false, true, false, false]), None);
    }
}
