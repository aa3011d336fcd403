/// Logical keys a simulation step may query.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    ToggleFullscreen,
}

impl Key {
    pub const ALL: [Key; 5] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::ToggleFullscreen,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Synchronous "is this key held right now" query.
///
/// Simulations ask through this instead of touching a device, so a step can
/// run against recorded or generated input.
pub trait InputState {
    fn is_pressed(&self, key: Key) -> bool;

    /// -1/0/+1 per axis from the arrow keys.
    fn axis(&self) -> (i8, i8) {
        let x = i8::from(self.is_pressed(Key::Right)) - i8::from(self.is_pressed(Key::Left));
        let y = i8::from(self.is_pressed(Key::Down)) - i8::from(self.is_pressed(Key::Up));
        (x, y)
    }
}

/// Set of currently held keys.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct HeldKeys {
    mask: u8,
}

impl HeldKeys {
    pub const fn none() -> Self {
        Self { mask: 0 }
    }

    pub fn press(&mut self, key: Key) {
        self.mask |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.mask &= !key.bit();
    }

    pub fn set(&mut self, key: Key, held: bool) {
        if held {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn clear(&mut self) {
        self.mask = 0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(move |k| self.is_pressed(*k))
    }
}

impl FromIterator<Key> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut keys = Self::none();
        for k in iter {
            keys.press(k);
        }
        keys
    }
}

impl InputState for HeldKeys {
    #[inline]
    fn is_pressed(&self, key: Key) -> bool {
        self.mask & key.bit() != 0
    }
}

impl<T: InputState + ?Sized> InputState for &T {
    fn is_pressed(&self, key: Key) -> bool {
        (**self).is_pressed(key)
    }
}
