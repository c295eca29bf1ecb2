//! Key presses and modifier state.
use std::ops::BitOr;

/// Modifier keys held during a key press.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt or meta.
    pub alt: bool,
}

impl Mods {
    /// Nothing held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift alone.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    /// Control alone.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    /// Alt alone.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Is no modifier held?
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// A key press of `code` with these modifiers.
    pub fn key(self, code: impl Into<KeyCode>) -> Key {
        Key {
            mods: self,
            key: code.into(),
        }
    }
}

impl BitOr for Mods {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            shift: self.shift | rhs.shift,
            ctrl: self.ctrl | rhs.ctrl,
            alt: self.alt | rhs.alt,
        }
    }
}

/// Logical key codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter/return key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Shift + Tab key.
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// F key. `F(1)` is F1.
    F(u8),
    /// A character.
    Char(char),
    /// Any key the backend could not name.
    Unknown,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// Fold shift into the key where the terminal already applied it.
    ///
    /// Shifted lowercase ASCII becomes uppercase without shift, other shifted
    /// characters drop the shift flag, and everything else is returned as-is.
    /// Comparisons never normalize implicitly.
    pub fn normalize(&self) -> Self {
        let KeyCode::Char(c) = self.key else {
            return *self;
        };
        if !self.mods.shift || c == ' ' {
            return *self;
        }
        Self {
            mods: Mods {
                shift: false,
                ..self.mods
            },
            key: KeyCode::Char(c.to_ascii_uppercase()),
        }
    }
}

/// A bare key code only matches presses with no modifiers.
impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        self.mods.is_empty() && self.key == *c
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        *self == KeyCode::Char(*c)
    }
}

impl PartialEq<Key> for char {
    fn eq(&self, k: &Key) -> bool {
        *k == KeyCode::Char(*self)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Mods::NONE.key(c)
    }
}

impl From<KeyCode> for Key {
    fn from(c: KeyCode) -> Self {
        Mods::NONE.key(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_shift() {
        let shift = Mods::SHIFT;
        assert_eq!(shift.key('a').normalize(), 'A');
        assert_eq!(shift.key('A').normalize(), 'A');
        assert_eq!(shift.key(')').normalize(), ')');
        assert_eq!(shift.key(' ').normalize(), shift.key(' '));
        assert_eq!(shift.key(KeyCode::Enter).normalize(), shift.key(KeyCode::Enter));
        assert_eq!((shift | Mods::ALT).key('a').normalize(), Mods::ALT.key('A'));
    }

    #[test]
    fn modifiers_block_plain_match() {
        assert_eq!(Key::from('q'), 'q');
        assert_ne!(Mods::CTRL.key('q'), Key::from('q'));
        assert!(Mods::CTRL.key('q') != 'q');
        assert_eq!(Key::from(KeyCode::Up), KeyCode::Up);
        assert!((Mods::CTRL | Mods::SHIFT).ctrl);
        assert!(Mods::default().is_empty());
    }
}
